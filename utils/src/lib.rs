//! Shared utilities for the host changelog cache.

pub mod display;
pub mod logging;

pub use display::{render_bytes, truncate};
pub use logging::{init_logging, init_logging_at, LogFormat};
