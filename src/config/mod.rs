//! Configuration management for utoo-setup

pub mod schema;

pub use schema::Config;

use crate::error::{SetupError, SetupResult};
use std::env;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Locates and reads the optional config file
pub struct ConfigManager {
    /// `None` when the platform has no config directory and no path was given
    config_path: Option<PathBuf>,
}

impl ConfigManager {
    /// Use the platform config directory
    pub fn new() -> Self {
        Self {
            config_path: Self::default_config_path(),
        }
    }

    /// Use an explicit config file
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            config_path: Some(path),
        }
    }

    /// `<config dir>/utoo-setup/config.toml`, if the platform has a config dir
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("utoo-setup").join("config.toml"))
    }

    /// Where carried state lives when not running under GitHub Actions
    ///
    /// Falls back to the system temp dir on hosts without a home, which is
    /// still private to the job on CI runners.
    pub fn state_dir() -> PathBuf {
        dirs::state_dir()
            .or_else(dirs::data_local_dir)
            .unwrap_or_else(env::temp_dir)
            .join("utoo-setup")
    }

    /// Load configuration; a missing file means defaults
    pub async fn load(&self) -> SetupResult<Config> {
        match &self.config_path {
            Some(path) if path.exists() => self.load_from_file(path).await,
            Some(path) => {
                debug!("No config file at {}, using defaults", path.display());
                Ok(Config::default())
            }
            None => {
                debug!("No config directory on this platform, using defaults");
                Ok(Config::default())
            }
        }
    }

    pub async fn load_from_file(&self, path: &Path) -> SetupResult<Config> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| SetupError::io(format!("reading config from {}", path.display()), e))?;

        toml::from_str(&content).map_err(|e| SetupError::ConfigInvalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}
