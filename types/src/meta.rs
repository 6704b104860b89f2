//! Per-host scan snapshot.

use serde::{Deserialize, Serialize};

use crate::{Distro, PackageInfo};

/// What the cache remembers about a host from its last scan.
///
/// `name` doubles as the key in the metadata bucket and as the name of the
/// host's changelog bucket.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Meta {
    pub name: String,
    pub distro: Distro,
    /// Installed packages in the order the scanner reported them.
    pub packs: Vec<PackageInfo>,
}

impl Meta {
    pub fn new(name: impl Into<String>, distro: Distro, packs: Vec<PackageInfo>) -> Self {
        Self {
            name: name.into(),
            distro,
            packs,
        }
    }

    /// Find a package by name. Returns the first match.
    pub fn find_pack(&self, name: &str) -> Option<&PackageInfo> {
        self.packs.iter().find(|p| p.name == name)
    }
}
