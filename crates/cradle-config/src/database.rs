//! Database configuration.

use serde::{Deserialize, Serialize};

/// Default database file path, relative to the working directory.
fn default_path() -> String {
    ".cradle/cradle.db".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Path to the libSQL database file, or `:memory:` for ephemeral use.
    #[serde(default = "default_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
        }
    }
}

impl DatabaseConfig {
    /// Whether the configured database is in-memory.
    #[must_use]
    pub fn is_in_memory(&self) -> bool {
        self.path == ":memory:"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = DatabaseConfig::default();
        assert_eq!(config.path, ".cradle/cradle.db");
        assert!(!config.is_in_memory());
    }

    #[test]
    fn in_memory_detection() {
        let config = DatabaseConfig {
            path: ":memory:".into(),
        };
        assert!(config.is_in_memory());
    }
}
