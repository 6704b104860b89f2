//! The host cache trait.

use hostcache_types::Meta;

use crate::CacheError;

/// Per-host metadata cache with a reset-on-write changelog bucket.
///
/// A handle is obtained from a backend constructor, used for the life of
/// the process, and released exactly once through [`close`](Self::close).
/// Every method is a single self-contained transaction.
pub trait HostCache {
    /// Release the backing store, flushing anything outstanding.
    fn close(self) -> Result<(), CacheError>
    where
        Self: Sized;

    /// Look up the metadata recorded for `host` by the last
    /// [`ensure_buckets`](Self::ensure_buckets).
    ///
    /// A missing key or an empty value is a cache miss (`Ok(None)`), not an
    /// error. Bytes that do not decode yield [`CacheError::Decode`].
    fn get_meta(&self, host: &str) -> Result<Option<Meta>, CacheError>;

    /// Store `meta` and reset the changelog bucket named `meta.name`.
    ///
    /// All of it commits together or none of it does. After a successful
    /// return the host's bucket exists and holds no entries.
    fn ensure_buckets(&self, meta: &Meta) -> Result<(), CacheError>;

    /// Log the stored metadata and every changelog entry for `meta.name`.
    fn pretty_print(&self, meta: &Meta) -> Result<(), CacheError>;
}
