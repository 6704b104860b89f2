//! Backend tuning.

use serde::{Deserialize, Serialize};

/// Sizing for the LMDB environment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LmdbConfig {
    /// Upper bound on the store file size, in bytes. Must be a multiple of
    /// the OS page size.
    #[serde(default = "default_map_size")]
    pub map_size: usize,

    /// How many hosts may have a changelog bucket. LMDB fixes the number of
    /// named databases when the environment is opened; ensuring a bucket for
    /// one more host fails with a transaction error.
    #[serde(default = "default_max_hosts")]
    pub max_hosts: u32,
}

fn default_map_size() -> usize {
    256 * 1024 * 1024
}

fn default_max_hosts() -> u32 {
    1024
}

impl LmdbConfig {
    /// Named databases to reserve: one per host plus the metadata bucket.
    pub fn max_dbs(&self) -> u32 {
        self.max_hosts.saturating_add(1)
    }
}

impl Default for LmdbConfig {
    fn default() -> Self {
        Self {
            map_size: default_map_size(),
            max_hosts: default_max_hosts(),
        }
    }
}
