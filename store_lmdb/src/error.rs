use thiserror::Error;

use hostcache_store::CacheError;

#[derive(Debug, Error)]
pub enum LmdbError {
    #[error("LMDB error: {0}")]
    Heed(String),

    #[error("io error: {0}")]
    Io(String),
}

impl From<heed::Error> for LmdbError {
    fn from(e: heed::Error) -> Self {
        match e {
            heed::Error::Io(io) => LmdbError::Io(io.to_string()),
            other => LmdbError::Heed(other.to_string()),
        }
    }
}

/// Engine failures inside an operation's transaction.
///
/// Open and close map their failures explicitly instead, since those are
/// reported as [`CacheError::Open`], [`CacheError::Bucket`] or
/// [`CacheError::Close`].
impl From<LmdbError> for CacheError {
    fn from(e: LmdbError) -> Self {
        CacheError::Transaction(e.to_string())
    }
}
