//! Nullable host cache: thread-safe in-memory storage for testing.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use tracing::debug;

use hostcache_store::{
    decode_meta, encode_meta, validate_bucket_name, CacheError, ChangelogStore, HostCache,
};
use hostcache_types::Meta;
use hostcache_utils::{render_bytes, truncate};

#[derive(Default)]
struct State {
    meta: BTreeMap<String, Vec<u8>>,
    buckets: BTreeMap<String, BTreeMap<Vec<u8>, Vec<u8>>>,
}

/// An in-memory [`HostCache`] + [`ChangelogStore`].
///
/// All state sits behind one mutex, so every operation is atomic the way a
/// transaction is in the real backend.
#[derive(Default)]
pub struct NullHostCache {
    state: Mutex<State>,
    fail_writes: AtomicBool,
}

impl NullHostCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent writes fail with [`CacheError::Transaction`] without
    /// changing any state. Reads keep working.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Store raw bytes as a host's metadata record, bypassing encoding.
    pub fn put_raw_meta(&self, host: &str, bytes: &[u8]) -> Result<(), CacheError> {
        self.state()?
            .meta
            .insert(host.to_string(), bytes.to_vec());
        Ok(())
    }

    /// Host names with a metadata record, in key order.
    pub fn hosts(&self) -> Result<Vec<String>, CacheError> {
        Ok(self.state()?.meta.keys().cloned().collect())
    }

    fn state(&self) -> Result<MutexGuard<'_, State>, CacheError> {
        self.state
            .lock()
            .map_err(|_| CacheError::Transaction("null cache state poisoned".to_string()))
    }

    fn check_writable(&self) -> Result<(), CacheError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(CacheError::Transaction("writes disabled".to_string()));
        }
        Ok(())
    }
}

impl HostCache for NullHostCache {
    fn close(self) -> Result<(), CacheError> {
        Ok(())
    }

    fn get_meta(&self, host: &str) -> Result<Option<Meta>, CacheError> {
        match self.state()?.meta.get(host) {
            Some(bytes) if !bytes.is_empty() => decode_meta(bytes).map(Some),
            _ => Ok(None),
        }
    }

    fn ensure_buckets(&self, meta: &Meta) -> Result<(), CacheError> {
        let bytes = encode_meta(meta)?;
        let mut state = self.state()?;
        self.check_writable()?;
        validate_bucket_name(&meta.name)?;

        debug!(host = %meta.name, "put to meta");
        state.meta.insert(meta.name.clone(), bytes);
        debug!(host = %meta.name, "create bucket");
        state.buckets.insert(meta.name.clone(), BTreeMap::new());
        Ok(())
    }

    fn pretty_print(&self, meta: &Meta) -> Result<(), CacheError> {
        let state = self.state()?;
        let value = state.meta.get(&meta.name).map(Vec::as_slice).unwrap_or_default();
        debug!(key = %meta.name, value = %render_bytes(value), "meta");
        let Some(bucket) = state.buckets.get(&meta.name) else {
            debug!(host = %meta.name, "no changelog bucket");
            return Ok(());
        };
        for (key, value) in bucket {
            let value = render_bytes(value);
            let value = truncate(&value, 100);
            debug!(key = %render_bytes(key), value = %value, "changelog");
        }
        Ok(())
    }
}

impl ChangelogStore for NullHostCache {
    fn put_changelog(&self, host: &str, key: &[u8], value: &[u8]) -> Result<(), CacheError> {
        let mut state = self.state()?;
        self.check_writable()?;
        state
            .buckets
            .get_mut(host)
            .ok_or_else(|| CacheError::BucketNotFound(host.to_string()))?
            .insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn get_changelog(&self, host: &str, key: &[u8]) -> Result<Option<Vec<u8>>, CacheError> {
        let state = self.state()?;
        let bucket = state
            .buckets
            .get(host)
            .ok_or_else(|| CacheError::BucketNotFound(host.to_string()))?;
        Ok(bucket.get(key).cloned())
    }

    fn changelog_entries(&self, host: &str) -> Result<Vec<(Vec<u8>, Vec<u8>)>, CacheError> {
        let state = self.state()?;
        let bucket = state
            .buckets
            .get(host)
            .ok_or_else(|| CacheError::BucketNotFound(host.to_string()))?;
        Ok(bucket
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hostcache_types::{Distro, PackageInfo};

    fn test_meta(name: &str) -> Meta {
        Meta::new(
            name,
            Distro::new("debian", "12"),
            vec![
                PackageInfo::new("curl", "7.88.1"),
                PackageInfo::new("bash", "5.2.15"),
            ],
        )
    }

    #[test]
    fn miss_then_hit() {
        let cache = NullHostCache::new();
        assert_eq!(cache.get_meta("host1").unwrap(), None);
        cache.ensure_buckets(&test_meta("host1")).unwrap();
        assert_eq!(cache.get_meta("host1").unwrap(), Some(test_meta("host1")));
    }

    #[test]
    fn ensure_resets_bucket() {
        let cache = NullHostCache::new();
        cache.ensure_buckets(&test_meta("host1")).unwrap();
        cache.put_changelog("host1", b"curl", b"entry").unwrap();
        cache.ensure_buckets(&test_meta("host1")).unwrap();
        assert!(cache.changelog_entries("host1").unwrap().is_empty());
    }

    #[test]
    fn failed_writes_keep_state() {
        let cache = NullHostCache::new();
        cache.ensure_buckets(&test_meta("host1")).unwrap();
        cache.put_changelog("host1", b"curl", b"entry").unwrap();

        cache.fail_writes(true);
        let mut changed = test_meta("host1");
        changed.packs.clear();
        assert!(cache.ensure_buckets(&changed).unwrap_err().is_transaction());
        assert!(cache.put_changelog("host1", b"bash", b"x").is_err());
        assert_eq!(cache.get_meta("host1").unwrap(), Some(test_meta("host1")));
        assert_eq!(cache.changelog_entries("host1").unwrap().len(), 1);

        cache.fail_writes(false);
        cache.ensure_buckets(&changed).unwrap();
        assert_eq!(cache.get_meta("host1").unwrap(), Some(changed));
    }

    #[test]
    fn invalid_name_is_rejected() {
        let cache = NullHostCache::new();
        let err = cache.ensure_buckets(&test_meta("")).unwrap_err();
        assert!(matches!(err, CacheError::InvalidBucketName(..)));
        assert!(cache.hosts().unwrap().is_empty());
    }

    #[test]
    fn raw_garbage_is_a_decode_error() {
        let cache = NullHostCache::new();
        cache.put_raw_meta("host1", b"garbage").unwrap();
        assert!(matches!(
            cache.get_meta("host1"),
            Err(CacheError::Decode(_))
        ));
        cache.put_raw_meta("host2", b"").unwrap();
        assert_eq!(cache.get_meta("host2").unwrap(), None);
    }

    #[test]
    fn poisoned_state_is_reported_not_dropped() {
        let cache = NullHostCache::new();
        let _ = std::thread::scope(|s| {
            s.spawn(|| {
                let _state = cache.state.lock().unwrap();
                panic!("poison the state lock");
            })
            .join()
        });
        let err = cache.put_raw_meta("host1", b"{}").unwrap_err();
        assert!(err.is_transaction(), "got {err:?}");
        assert!(cache.get_meta("host1").is_err());
    }

    #[test]
    fn unknown_host_bucket() {
        let cache = NullHostCache::new();
        assert!(matches!(
            cache.get_changelog("host1", b"curl"),
            Err(CacheError::BucketNotFound(_))
        ));
    }

    #[test]
    fn pretty_print_and_close() {
        let cache = NullHostCache::new();
        cache.ensure_buckets(&test_meta("host1")).unwrap();
        cache.put_changelog("host1", b"curl", &[b'x'; 300]).unwrap();
        cache.pretty_print(&test_meta("host1")).unwrap();
        cache.pretty_print(&test_meta("host2")).unwrap();
        cache.close().unwrap();
    }
}
