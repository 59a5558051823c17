//! Package manager install
//!
//! Runs a global install into the layout's prefix and then confirms the
//! result by probing the executable instead of trusting the exit code.

use crate::error::{SetupError, SetupResult};
use crate::layout::Layout;
use crate::probe::Probe;
use crate::process::CommandRunner;
use crate::request::LATEST;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// A verified installation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Installed {
    /// Executable that answered the version probe
    pub path: PathBuf,
    /// Version it reported
    pub version: String,
}

/// Installs one package with an npm-compatible package manager
pub struct Installer<'a> {
    runner: &'a dyn CommandRunner,
    package_manager: &'a Path,
    package: &'a str,
    executable: &'a str,
    layout: &'a Layout,
}

impl<'a> Installer<'a> {
    pub fn new(
        runner: &'a dyn CommandRunner,
        package_manager: &'a Path,
        package: &'a str,
        executable: &'a str,
        layout: &'a Layout,
    ) -> Self {
        Self {
            runner,
            package_manager,
            package,
            executable,
            layout,
        }
    }

    /// Package spec for `version`: bare name for `latest`, `name@version` otherwise
    pub fn package_spec(&self, version: &str) -> String {
        if version == LATEST {
            self.package.to_string()
        } else {
            format!("{}@{}", self.package, version)
        }
    }

    /// Arguments for the global install
    pub fn install_args(&self, version: &str, registry: &str, store_dir: Option<&Path>) -> Vec<String> {
        let mut args = vec![
            "install".to_string(),
            "-g".to_string(),
            self.package_spec(version),
            format!("--registry={}", registry),
            format!("--prefix={}", self.layout.prefix.display()),
        ];
        if let Some(dir) = store_dir {
            args.push(format!("--cache={}", dir.display()));
        }
        args
    }

    /// Install `version` from `registry` and return the verified executable
    ///
    /// A non-zero exit is `InstallFailed` (worth retrying). A clean exit that
    /// leaves nothing probeable behind is `NoUsableExecutable` (not).
    pub async fn install(
        &self,
        version: &str,
        registry: &str,
        store_dir: Option<&Path>,
    ) -> SetupResult<Installed> {
        let args = self.install_args(version, registry, store_dir);
        info!("Running {} {}", self.package_manager.display(), args.join(" "));

        let output = self.runner.run(self.package_manager, &args).await?;
        if !output.success() {
            return Err(SetupError::InstallFailed {
                package: self.package.to_string(),
                stderr: output.stderr.trim().to_string(),
            });
        }
        debug!("Install finished: {}", output.stdout.trim());

        let candidates = self.layout.executable_candidates(self.executable);
        let (path, version) = Probe::new(self.runner)
            .first_usable(&candidates)
            .await
            .ok_or_else(|| SetupError::NoUsableExecutable {
                package: self.package.to_string(),
            })?;

        info!("Installed {} {} at {}", self.package, version, path.display());
        Ok(Installed { path, version })
    }
}
