//! CLI configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use hostcache_store_lmdb::LmdbConfig;
use hostcache_utils::LogFormat;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {reason}")]
    Read { path: String, reason: String },

    #[error("invalid config: {0}")]
    Parse(String),
}

/// Configuration for the `hostcache` tool.
///
/// Loaded from a TOML file via [`CliConfig::from_toml_file`]; every field
/// has a default, so an empty file is valid.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CliConfig {
    /// Cache file location.
    #[serde(default = "default_path")]
    pub path: PathBuf,

    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub lmdb: LmdbConfig,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_path() -> PathBuf {
    PathBuf::from("./cache.db")
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl CliConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Read {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
            lmdb: LmdbConfig::default(),
        }
    }
}
