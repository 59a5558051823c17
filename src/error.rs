//! Error types for utoo-setup
//!
//! All modules use `SetupResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for utoo-setup operations
pub type SetupResult<T> = Result<T, SetupError>;

/// All errors that can occur while acquiring or caching the tool
#[derive(Error, Debug)]
pub enum SetupError {
    // Install errors
    #[error("Failed to install {package}: {stderr}")]
    InstallFailed { package: String, stderr: String },

    #[error("{package} was installed but the executable could not be found or verified")]
    NoUsableExecutable { package: String },

    #[error("Failed to install {package} or get its version. Please try again.")]
    VersionUnresolved { package: String },

    // Cache errors
    #[error("Cache operation failed for key {key}: {reason}")]
    Cache { key: String, reason: String },

    // State errors
    #[error("Failed to persist state {name}: {reason}")]
    StatePersist { name: String, reason: String },

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Could not determine the home directory")]
    HomeDirUnknown,

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Process errors
    #[error("Command failed: {command}")]
    CommandFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    // General errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl SetupError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a command failed error
    pub fn command_failed(command: impl Into<String>, source: std::io::Error) -> Self {
        Self::CommandFailed {
            command: command.into(),
            source,
        }
    }

    /// Create a cache error
    pub fn cache(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Cache {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Check if error is retryable
    ///
    /// Only a package manager run that exited non-zero is worth another
    /// attempt. An install that succeeded but left no usable executable
    /// fails the same way every time.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::InstallFailed { .. })
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::InstallFailed { .. } => {
                Some("Check that the registry is reachable and the requested version exists")
            }
            Self::NoUsableExecutable { .. } => {
                Some("Check that the package declares the executable in its `bin` field")
            }
            Self::CommandFailed { .. } => {
                Some("Make sure the package manager is installed and on PATH")
            }
            Self::HomeDirUnknown => Some("Set HOME or configure install.prefix explicitly"),
            _ => None,
        }
    }
}
