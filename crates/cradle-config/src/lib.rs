//! # cradle-config
//!
//! Layered configuration loading for Cradle using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`CRADLE_*` prefix, `__` as separator)
//! 2. Project-level `.cradle/config.toml`
//! 3. User-level `~/.config/cradle/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `CRADLE_DATABASE__PATH` -> `database.path`,
//! `CRADLE_REMINDERS__INTERVAL_DAYS` -> `reminders.interval_days`, etc.
//! The `__` (double underscore) separates nested config sections.
//!
//! # Usage
//!
//! ```no_run
//! use cradle_config::CradleConfig;
//!
//! // Load from all sources (dotenvy + TOML + env):
//! let config = CradleConfig::load_with_dotenv().expect("config");
//!
//! // Or without dotenvy (env vars must already be set):
//! let config = CradleConfig::load().expect("config");
//!
//! println!("database at {}", config.database.path);
//! ```

mod database;
mod error;
mod reference;
mod reminders;

pub use database::DatabaseConfig;
pub use error::ConfigError;
pub use reference::ReferenceConfig;
pub use reminders::ReminderConfig;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CradleConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub reference: ReferenceConfig,
    #[serde(default)]
    pub reminders: ReminderConfig,
}

impl CradleConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need
    /// `.env` file loading.
    ///
    /// Precedence (highest to lowest):
    /// 1. Environment variables (`CRADLE_*` prefix)
    /// 2. `.cradle/config.toml` (project-local)
    /// 3. `~/.config/cradle/config.toml` (user-global)
    /// 4. Default values
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction from the merged providers fails.
    pub fn load() -> Result<Self, ConfigError> {
        Self::figment().extract().map_err(ConfigError::from)
    }

    /// Load configuration with `.env` file support.
    ///
    /// Calls `dotenvy` to load the `.env` file from the workspace root before
    /// building the figment. This is the typical entry point for services and
    /// tests.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction from the merged providers fails.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        Self::load_dotenv_from_workspace();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// This is public so tests can inspect the figment directly or add
    /// additional providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".cradle/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment = figment.merge(Env::prefixed("CRADLE_").split("__"));

        figment
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("cradle").join("config.toml"))
    }

    /// Load `.env` from the workspace root.
    ///
    /// Walks up from `CARGO_MANIFEST_DIR` (if available) or current dir looking
    /// for a `.env` file. Silently does nothing if no `.env` is found.
    fn load_dotenv_from_workspace() {
        if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
            let mut dir = PathBuf::from(manifest_dir);
            // Walk up at most 3 levels (crate -> crates/ -> workspace root)
            for _ in 0..3 {
                let env_path = dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                    return;
                }
                if !dir.pop() {
                    break;
                }
            }
        }

        // Fallback: try current directory
        let _ = dotenvy::dotenv();
    }
}
