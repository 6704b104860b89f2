//! LMDB storage backend for the host changelog cache.
//!
//! Implements the traits from `hostcache-store` using the `heed` LMDB
//! bindings. The whole cache lives in one LMDB file: a named database for
//! host metadata plus one named database per host for its changelogs.

pub mod cache;
pub mod changelog;
pub mod config;
pub mod environment;
pub mod error;
pub mod integrity;

pub use config::LmdbConfig;
pub use environment::LmdbEnvironment;
pub use error::LmdbError;
pub use integrity::{check_integrity, IntegrityReport};
