//! CI platform boundary
//!
//! Inputs arrive through clap (`INPUT_*` variables); this module handles the
//! other direction: outputs, PATH additions and failure annotations. Outside
//! GitHub Actions everything degrades to stdout and log lines.

pub mod command_file;

use crate::error::SetupResult;
use std::env;
use std::path::{Path, PathBuf};
use tracing::info;

/// File-command destinations provided by the runner
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionsEnv {
    pub output_file: Option<PathBuf>,
    pub path_file: Option<PathBuf>,
    pub state_file: Option<PathBuf>,
}

impl ActionsEnv {
    /// Read destinations from the process environment
    pub fn from_env() -> Self {
        let var = |name: &str| {
            env::var_os(name)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
        };
        Self {
            output_file: var("GITHUB_OUTPUT"),
            path_file: var("GITHUB_PATH"),
            state_file: var("GITHUB_STATE"),
        }
    }

    /// Whether this process runs as a GitHub Actions step
    pub fn is_actions() -> bool {
        env::var("GITHUB_ACTIONS").is_ok_and(|v| v == "true")
    }

    /// Set a step output
    pub async fn set_output(&self, name: &str, value: &str) -> SetupResult<()> {
        match &self.output_file {
            Some(path) => {
                let entry = command_file::key_value_entry(name, value)?;
                command_file::append(path, &entry).await
            }
            None => {
                println!("{}={}", name, value);
                Ok(())
            }
        }
    }

    /// Prepend `dir` to PATH for later steps
    pub async fn add_path(&self, dir: &Path) -> SetupResult<()> {
        match &self.path_file {
            Some(path) => command_file::append(path, &format!("{}\n", dir.display())).await,
            None => {
                info!("Add {} to PATH to use the installed tool", dir.display());
                Ok(())
            }
        }
    }
}

/// `::error::` workflow command marking the step failed
pub fn error_command(message: &str) -> String {
    format!("::error::{}", command_file::escape_data(message))
}
