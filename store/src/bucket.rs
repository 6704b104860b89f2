//! Bucket naming rules.

use crate::CacheError;

/// Name of the bucket that maps host names to their serialized [`Meta`].
///
/// [`Meta`]: hostcache_types::Meta
pub const META_BUCKET: &str = "changelog-meta";

/// Longest bucket name accepted, in bytes. Bucket names are stored as keys
/// in the backend's catalog, so they share its key size limit.
pub const MAX_BUCKET_NAME_LEN: usize = 511;

/// Check that a host name can be used verbatim as a bucket name.
///
/// Host names are not escaped, so a name equal to [`META_BUCKET`] is refused:
/// recreating it would wipe every host's metadata.
pub fn validate_bucket_name(name: &str) -> Result<(), CacheError> {
    let reason = if name.is_empty() {
        "name is empty"
    } else if name.len() > MAX_BUCKET_NAME_LEN {
        "name is longer than 511 bytes"
    } else if name.contains('\0') {
        "name contains a NUL byte"
    } else if name == META_BUCKET {
        "name is reserved for the metadata bucket"
    } else {
        return Ok(());
    };
    Err(CacheError::InvalidBucketName(name.to_string(), reason))
}
