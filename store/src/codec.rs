//! JSON encoding of metadata records.
//!
//! Both backends store [`Meta`] through these functions so the on-disk value
//! is identical regardless of which one wrote it.

use hostcache_types::Meta;

use crate::CacheError;

pub fn encode_meta(meta: &Meta) -> Result<Vec<u8>, CacheError> {
    serde_json::to_vec(meta).map_err(|e| CacheError::Encode(e.to_string()))
}

pub fn decode_meta(bytes: &[u8]) -> Result<Meta, CacheError> {
    serde_json::from_slice(bytes).map_err(|e| CacheError::Decode(e.to_string()))
}
