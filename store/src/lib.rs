//! Abstract cache traits for per-host scan metadata and changelogs.
//!
//! Every backend (LMDB, in-memory for testing) implements these traits.
//! Callers depend only on the traits, so a scan can run against a real
//! store file or a nullable cache without changes.

pub mod bucket;
pub mod cache;
pub mod changelog;
pub mod codec;
pub mod error;

pub use bucket::{validate_bucket_name, MAX_BUCKET_NAME_LEN, META_BUCKET};
pub use cache::HostCache;
pub use changelog::ChangelogStore;
pub use codec::{decode_meta, encode_meta};
pub use error::CacheError;
