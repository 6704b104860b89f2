//! Nullable infrastructure for deterministic testing.
//!
//! Provides a test-friendly implementation of the cache traits that:
//! - Keeps everything in memory and never touches the filesystem
//! - Goes through the same codec and bucket-name rules as the real backend
//! - Can be told to fail writes, to exercise caller error paths
//!
//! Usage: swap `LmdbEnvironment` for [`NullHostCache`] in tests.

pub mod cache;

pub use cache::NullHostCache;
