//! OS distribution identity.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The OS family and release a host was running at scan time.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Distro {
    /// Distribution family, e.g. `"ubuntu"` or `"debian"`.
    pub family: String,
    /// Release string as reported by the host, e.g. `"22.04"`.
    pub release: String,
}

impl Distro {
    pub fn new(family: impl Into<String>, release: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            release: release.into(),
        }
    }
}

impl fmt::Display for Distro {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.family, self.release)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_joins_family_and_release() {
        assert_eq!(Distro::new("debian", "12").to_string(), "debian 12");
    }

    #[test]
    fn json_uses_pascal_case_fields() {
        let json = serde_json::to_string(&Distro::new("ubuntu", "22.04")).unwrap();
        assert_eq!(json, r#"{"Family":"ubuntu","Release":"22.04"}"#);
    }
}
