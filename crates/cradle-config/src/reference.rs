//! Immunization reference table configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ReferenceConfig {
    /// Optional path to a TOML reference-table override. When unset, the
    /// table embedded in `cradle-schedule` is used.
    #[serde(default)]
    pub table_path: Option<PathBuf>,
}

impl ReferenceConfig {
    /// Whether a deployment-specific table override is configured.
    #[must_use]
    pub const fn has_override(&self) -> bool {
        self.table_path.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_has_no_override() {
        let config = ReferenceConfig::default();
        assert!(!config.has_override());
    }

    #[test]
    fn override_detection() {
        let config = ReferenceConfig {
            table_path: Some(PathBuf::from("/etc/cradle/table.toml")),
        };
        assert!(config.has_override());
    }
}
