//! Host metadata types for the changelog cache.
//!
//! These are the values the scan pipeline hands to the cache and reads back:
//! the distribution a host runs, its installed packages, and the per-host
//! [`Meta`] snapshot that ties them together.

pub mod distro;
pub mod meta;
pub mod package;

pub use distro::Distro;
pub use meta::Meta;
pub use package::PackageInfo;
