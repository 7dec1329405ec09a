//! Layered configuration for the folio binary.
//!
//! Settings merge in increasing precedence: built-in defaults, the
//! user-level `folio.toml` in the platform config directory, a `folio.toml`
//! in the working directory, and finally `FOLIO_`-prefixed environment
//! variables (nested keys separated by `__`, e.g.
//! `FOLIO_DATABASE__MAX_CONNECTIONS`).

pub mod error;

use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

const CONFIG_FILENAME: &str = "folio.toml";
const ENV_PREFIX: &str = "FOLIO_";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub database: DatabaseSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// Path to the SQLite catalog file; created on first use.
    pub path: PathBuf,
    pub max_connections: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database: DatabaseSettings {
                path: default_database_path(),
                max_connections: 5,
            },
        }
    }
}

/// `catalog.db` inside the platform data directory, falling back to the
/// working directory when the home directory cannot be determined.
fn default_database_path() -> PathBuf {
    ProjectDirs::from("", "", "folio")
        .map(|dirs| dirs.data_dir().join("catalog.db"))
        .unwrap_or_else(|| PathBuf::from("catalog.db"))
}

impl Settings {
    /// Load and validate the merged configuration.
    pub fn load() -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Settings::default()));
        if let Some(dirs) = ProjectDirs::from("", "", "folio") {
            figment = figment.merge(Toml::file(dirs.config_dir().join(CONFIG_FILENAME)));
        }
        let settings: Settings = figment
            .merge(Toml::file(CONFIG_FILENAME))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .or_raise(|| ErrorKind::Load)?;
        settings.validate()?;
        debug!(path = %settings.database.path.display(), "configuration loaded");
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if self.database.max_connections == 0 {
            exn::bail!(ErrorKind::Invalid("database.max_connections must be at least 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        settings.validate().unwrap();
        assert_eq!(settings.database.max_connections, 5);
        assert!(settings.database.path.ends_with("catalog.db"));
    }

    #[test]
    fn test_file_overrides_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                CONFIG_FILENAME,
                r#"
                    [database]
                    path = "local.db"
                    max_connections = 2
                "#,
            )?;
            let settings = Settings::load().expect("load");
            assert_eq!(settings.database.path, PathBuf::from("local.db"));
            assert_eq!(settings.database.max_connections, 2);
            Ok(())
        });
    }

    #[test]
    fn test_environment_overrides_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(CONFIG_FILENAME, "[database]\nmax_connections = 2\n")?;
            jail.set_env("FOLIO_DATABASE__MAX_CONNECTIONS", "9");
            let settings = Settings::load().expect("load");
            assert_eq!(settings.database.max_connections, 9);
            Ok(())
        });
    }

    #[test]
    fn test_zero_connections_is_rejected() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("FOLIO_DATABASE__MAX_CONNECTIONS", "0");
            let err = Settings::load().expect_err("validation");
            assert!(err.to_string().contains("max_connections"));
            Ok(())
        });
    }
}
