//! GitHub Actions file commands
//!
//! Outputs, state and PATH additions are appended to files named by
//! `GITHUB_OUTPUT`, `GITHUB_STATE` and `GITHUB_PATH`. Key/value entries use a
//! random heredoc delimiter so values may contain newlines.

use crate::error::{SetupError, SetupResult};
use std::path::Path;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

/// Render a `name<<delimiter` entry
pub fn key_value_entry(name: &str, value: &str) -> SetupResult<String> {
    let delimiter = format!("ghadelimiter_{}", uuid::Uuid::new_v4());
    if name.contains(&delimiter) || value.contains(&delimiter) {
        return Err(SetupError::Internal(format!(
            "value for {} contains the command delimiter",
            name
        )));
    }
    Ok(format!("{name}<<{delimiter}\n{value}\n{delimiter}\n"))
}

/// Append `content` to the command file at `path`
pub async fn append(path: &Path, content: &str) -> SetupResult<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await
        .map_err(|e| SetupError::io(format!("opening command file {}", path.display()), e))?;

    file.write_all(content.as_bytes())
        .await
        .map_err(|e| SetupError::io(format!("writing command file {}", path.display()), e))?;
    file.flush()
        .await
        .map_err(|e| SetupError::io(format!("flushing command file {}", path.display()), e))?;
    Ok(())
}

/// Escape a message for a `::command::` line
pub fn escape_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}
