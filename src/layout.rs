//! On-disk install layout

use crate::config::schema::InstallConfig;
use crate::error::{SetupError, SetupResult};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Where the tool and the package manager store live
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    /// Global install prefix passed to the package manager
    pub prefix: PathBuf,
    /// Directory the package manager links executables into
    pub bin_dir: PathBuf,
    /// Package manager artifact store
    pub store_dir: PathBuf,
}

impl Layout {
    /// Layout rooted at `prefix` with the store at `store_dir`
    pub fn new(prefix: PathBuf, store_dir: PathBuf) -> Self {
        Self {
            bin_dir: prefix.join("bin"),
            prefix,
            store_dir,
        }
    }

    /// Resolve configured paths, defaulting to `~/.npm` and `~/.cache/nm`
    pub fn from_config(config: &InstallConfig) -> SetupResult<Self> {
        let home = || dirs::home_dir().ok_or(SetupError::HomeDirUnknown);
        let prefix = match &config.prefix {
            Some(prefix) => prefix.clone(),
            None => home()?.join(".npm"),
        };
        let store_dir = match &config.store_dir {
            Some(dir) => dir.clone(),
            None => home()?.join(".cache").join("nm"),
        };
        Ok(Self::new(prefix, store_dir))
    }

    /// Create the bin and store directories
    ///
    /// An existing directory is fine; any other failure aborts the run before
    /// cache or install work starts.
    pub async fn ensure(&self) -> SetupResult<()> {
        for dir in [&self.bin_dir, &self.store_dir] {
            ensure_dir(dir).await?;
        }
        Ok(())
    }

    /// Path the executable named `name` is expected at on this platform
    pub fn executable(&self, name: &str) -> PathBuf {
        self.bin_dir.join(exe(name))
    }

    /// Paths to try after an install, most likely first, without duplicates
    pub fn executable_candidates(&self, name: &str) -> Vec<PathBuf> {
        let mut candidates = Vec::new();
        for path in [
            self.executable(name),
            self.bin_dir.join(name),
            self.bin_dir.join(format!("{}.cmd", name)),
        ] {
            if !candidates.contains(&path) {
                candidates.push(path);
            }
        }
        candidates
    }
}

/// Executable file name with the platform's wrapper extension
pub fn exe(name: &str) -> String {
    if cfg!(windows) {
        format!("{}.cmd", name)
    } else {
        name.to_string()
    }
}

async fn ensure_dir(dir: &Path) -> SetupResult<()> {
    match fs::create_dir_all(dir).await {
        Ok(()) => {
            debug!("Ensured directory {}", dir.display());
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(()),
        Err(e) => Err(SetupError::io(format!("creating directory {}", dir.display()), e)),
    }
}
