//! Installed package records.

use serde::{Deserialize, Serialize};

/// A package observed on a host during a scan.
///
/// Field names serialize in PascalCase so that records written by older
/// scanners decode unchanged. Absent fields decode as empty strings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct PackageInfo {
    pub name: String,
    pub version: String,
    pub release: String,
    /// Candidate version offered by the package manager, if any.
    pub new_version: String,
    pub new_release: String,
    pub repository: String,
}

impl PackageInfo {
    /// Create a package with just a name and installed version.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            ..Self::default()
        }
    }

    /// Installed version as `version-release`, or `version` alone when the
    /// release is empty.
    pub fn formatted_version(&self) -> String {
        join_version(&self.version, &self.release)
    }

    /// Candidate version in the same format as [`formatted_version`](Self::formatted_version).
    pub fn formatted_new_version(&self) -> String {
        join_version(&self.new_version, &self.new_release)
    }
}

fn join_version(version: &str, release: &str) -> String {
    if release.is_empty() {
        version.to_string()
    } else {
        format!("{version}-{release}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formatted_version_without_release() {
        let pack = PackageInfo::new("curl", "7.81.0");
        assert_eq!(pack.formatted_version(), "7.81.0");
    }

    #[test]
    fn formatted_version_with_release() {
        let pack = PackageInfo {
            release: "1ubuntu1.15".into(),
            ..PackageInfo::new("curl", "7.81.0")
        };
        assert_eq!(pack.formatted_version(), "7.81.0-1ubuntu1.15");
    }

    #[test]
    fn formatted_new_version() {
        let pack = PackageInfo {
            new_version: "7.81.0".into(),
            new_release: "1ubuntu1.16".into(),
            ..PackageInfo::new("curl", "7.81.0")
        };
        assert_eq!(pack.formatted_new_version(), "7.81.0-1ubuntu1.16");
    }

    #[test]
    fn missing_fields_decode_as_empty() {
        let pack: PackageInfo = serde_json::from_str(r#"{"Name":"bash"}"#).unwrap();
        assert_eq!(pack.name, "bash");
        assert!(pack.version.is_empty());
        assert!(pack.repository.is_empty());
    }
}
