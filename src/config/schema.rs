//! Configuration schema for utoo-setup
//!
//! Configuration is optional and stored at `~/.config/utoo-setup/config.toml`.
//! Action inputs (flags and `INPUT_*` variables) take precedence for
//! everything they cover.

use crate::cache::KeyStyle;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Which package and executable to acquire
    pub tool: ToolConfig,

    /// Package manager invocation and install layout
    pub install: InstallConfig,

    /// Cache settings
    pub cache: CacheConfig,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log format: "text" or "json"
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_format: "text".to_string(),
        }
    }
}

/// The tool being acquired
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// Package name in the registry
    pub package: String,

    /// Executable name the package installs
    pub executable: String,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            package: "utoo".to_string(),
            executable: "utoo".to_string(),
        }
    }
}

/// Install configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallConfig {
    /// Package manager executable
    pub package_manager: String,

    /// Global install prefix (defaults to `~/.npm`)
    pub prefix: Option<PathBuf>,

    /// Package manager artifact store (defaults to `~/.cache/nm`)
    pub store_dir: Option<PathBuf>,

    /// Retries after the first failed install attempt
    pub retries: u32,

    /// Base delay between attempts, multiplied by the attempt number
    pub retry_delay_ms: u64,
}

impl Default for InstallConfig {
    fn default() -> Self {
        Self {
            package_manager: if cfg!(windows) { "npm.cmd" } else { "npm" }.to_string(),
            prefix: None,
            store_dir: None,
            retries: 3,
            retry_delay_ms: 1000,
        }
    }
}

/// Cache configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Root of the local cache backend; caching is unavailable when unset
    pub backend_dir: Option<PathBuf>,

    /// How cache keys are rendered
    pub key_style: KeyStyle,

    /// Where carried state lives outside GitHub Actions
    pub state_dir: Option<PathBuf>,
}
