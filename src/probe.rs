//! Executable probing
//!
//! An installation counts as usable only if the executable exists and
//! answers `--version` successfully.

use crate::process::CommandRunner;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};
use tracing::debug;

/// `MAJOR.MINOR.PATCH` with an optional `-prerelease` tag
pub static VERSION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+\.\d+\.\d+(?:-[^\s]+)?)").expect("Invalid VERSION_RE regex"));

/// Extract a version from `--version` output
///
/// Output like `utoo 1.0.0` or `1.0.0` yields the semantic version; anything
/// else non-empty is returned trimmed as-is.
pub fn extract_version(output: &str) -> Option<String> {
    let trimmed = output.trim();
    if trimmed.is_empty() {
        return None;
    }
    let version = VERSION_RE
        .captures(trimmed)
        .and_then(|caps| caps.get(1))
        .map_or(trimmed, |m| m.as_str());
    Some(version.to_string())
}

/// Version prober over a command runner
pub struct Probe<'a> {
    runner: &'a dyn CommandRunner,
}

impl<'a> Probe<'a> {
    pub fn new(runner: &'a dyn CommandRunner) -> Self {
        Self { runner }
    }

    /// Version of the executable at `path`, or `None` if it is not usable
    pub async fn version(&self, path: &Path) -> Option<String> {
        if !path.exists() {
            debug!("No executable at {}", path.display());
            return None;
        }

        let output = match self.runner.run(path, &["--version".to_string()]).await {
            Ok(output) => output,
            Err(e) => {
                debug!("Version check failed for {}: {}", path.display(), e);
                return None;
            }
        };

        if !output.success() {
            debug!(
                "{} --version exited with {:?}",
                path.display(),
                output.code
            );
            return None;
        }

        extract_version(&output.stdout)
    }

    /// First candidate that probes successfully, with its version
    pub async fn first_usable(&self, candidates: &[PathBuf]) -> Option<(PathBuf, String)> {
        for candidate in candidates {
            if let Some(version) = self.version(candidate).await {
                return Some((candidate.clone(), version));
            }
        }
        None
    }
}
