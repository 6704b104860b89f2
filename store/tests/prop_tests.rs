use proptest::prelude::*;

use hostcache_store::{decode_meta, encode_meta};
use hostcache_types::{Distro, Meta, PackageInfo};

fn package() -> impl Strategy<Value = PackageInfo> {
    (
        "[a-z0-9][a-z0-9+.-]{0,20}",
        "[0-9][0-9a-z.:~+]{0,12}",
        ".{0,10}",
        ".{0,10}",
        ".{0,10}",
        ".{0,16}",
    )
        .prop_map(|(name, version, release, new_version, new_release, repository)| PackageInfo {
            name,
            version,
            release,
            new_version,
            new_release,
            repository,
        })
}

fn meta() -> impl Strategy<Value = Meta> {
    (
        "[a-z0-9.-]{1,30}",
        "[a-z]{1,10}",
        "[0-9.]{1,8}",
        prop::collection::vec(package(), 1..20),
    )
        .prop_map(|(name, family, release, packs)| {
            Meta::new(name, Distro::new(family, release), packs)
        })
}

proptest! {
    /// Meta survives an encode/decode round trip field for field, pack order included.
    #[test]
    fn meta_roundtrip(meta in meta()) {
        let bytes = encode_meta(&meta).unwrap();
        let decoded = decode_meta(&bytes).unwrap();
        prop_assert_eq!(decoded, meta);
    }

    /// find_pack agrees with a linear scan for every stored package name.
    #[test]
    fn find_pack_matches_first_occurrence(meta in meta()) {
        for pack in &meta.packs {
            let found = meta.find_pack(&pack.name).unwrap();
            let first = meta.packs.iter().find(|p| p.name == pack.name).unwrap();
            prop_assert!(std::ptr::eq(found, first));
        }
    }
}
