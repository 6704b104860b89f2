use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("failed to open cache: {0}")]
    Open(String),

    #[error("failed to create bucket: {0}")]
    Bucket(String),

    #[error("failed to close cache: {0}")]
    Close(String),

    #[error("failed to decode meta: {0}")]
    Decode(String),

    #[error("failed to encode meta: {0}")]
    Encode(String),

    #[error("transaction failed: {0}")]
    Transaction(String),

    /// The name cannot be used as a bucket. Raised inside the write
    /// transaction, so it rolls back like any other write failure.
    #[error("transaction failed: invalid bucket name {0:?}: {1}")]
    InvalidBucketName(String, &'static str),

    #[error("bucket not found: {0}")]
    BucketNotFound(String),
}

impl CacheError {
    /// Whether this is a write failure that left the store unchanged.
    pub fn is_transaction(&self) -> bool {
        matches!(self, Self::Transaction(_) | Self::InvalidBucketName(..))
    }
}
