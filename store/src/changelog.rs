//! Per-host changelog entry storage.

use crate::CacheError;

/// Access to the changelog bucket of each host.
///
/// Keys and values are whatever the changelog fetcher chooses; the cache
/// never interprets them. The bucket must have been created by
/// [`HostCache::ensure_buckets`](crate::HostCache::ensure_buckets) first,
/// otherwise every method fails with [`CacheError::BucketNotFound`].
pub trait ChangelogStore {
    /// Insert or replace one changelog entry.
    fn put_changelog(&self, host: &str, key: &[u8], value: &[u8]) -> Result<(), CacheError>;

    /// Get one changelog entry.
    fn get_changelog(&self, host: &str, key: &[u8]) -> Result<Option<Vec<u8>>, CacheError>;

    /// Every entry in the host's bucket, in key order.
    fn changelog_entries(&self, host: &str) -> Result<Vec<(Vec<u8>, Vec<u8>)>, CacheError>;
}
