//! Persistence slot for carried state
//!
//! Under GitHub Actions the slot is the runner's `GITHUB_STATE` file, which
//! comes back as `STATE_<name>` in the post step. Elsewhere it is a JSON file
//! per name in a state directory.

use crate::error::{SetupError, SetupResult};
use crate::platform::command_file;
use async_trait::async_trait;
use std::env;
use std::path::PathBuf;
use tokio::fs;
use tracing::debug;

/// String-keyed, string-valued store surviving between job phases
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Persist `value` under `name`
    async fn save(&self, name: &str, value: &str) -> SetupResult<()>;

    /// Value saved under `name` by an earlier phase, if any
    async fn load(&self, name: &str) -> SetupResult<Option<String>>;

    /// Drop whatever is saved under `name`
    async fn clear(&self, name: &str) -> SetupResult<()>;
}

/// State carried by the Actions runner
pub struct ActionsStateStore {
    state_file: PathBuf,
}

impl ActionsStateStore {
    pub fn new(state_file: PathBuf) -> Self {
        Self { state_file }
    }

    fn env_name(name: &str) -> String {
        format!("STATE_{}", name)
    }
}

#[async_trait]
impl StateStore for ActionsStateStore {
    async fn save(&self, name: &str, value: &str) -> SetupResult<()> {
        let entry = command_file::key_value_entry(name, value)?;
        command_file::append(&self.state_file, &entry).await
    }

    async fn load(&self, name: &str) -> SetupResult<Option<String>> {
        Ok(env::var(Self::env_name(name)).ok().filter(|v| !v.is_empty()))
    }

    /// The runner scopes state to one job, so there is nothing to drop
    async fn clear(&self, _name: &str) -> SetupResult<()> {
        Ok(())
    }
}

/// State kept as `<dir>/<name>.json`
pub struct FileStateStore {
    dir: PathBuf,
}

impl FileStateStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.json", name))
    }
}

#[async_trait]
impl StateStore for FileStateStore {
    async fn save(&self, name: &str, value: &str) -> SetupResult<()> {
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| SetupError::io("creating state directory", e))?;

        let path = self.path(name);
        fs::write(&path, value).await.map_err(|e| SetupError::StatePersist {
            name: name.to_string(),
            reason: format!("{}: {}", path.display(), e),
        })?;

        debug!("Saved state {} to {}", name, path.display());
        Ok(())
    }

    async fn load(&self, name: &str) -> SetupResult<Option<String>> {
        let path = self.path(name);
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path)
            .await
            .map_err(|e| SetupError::io(format!("reading state file {}", path.display()), e))?;
        Ok(Some(content).filter(|c| !c.trim().is_empty()))
    }

    async fn clear(&self, name: &str) -> SetupResult<()> {
        let path = self.path(name);
        match fs::remove_file(&path).await {
            Ok(()) => {
                debug!("Removed state file {}", path.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SetupError::StatePersist {
                name: name.to_string(),
                reason: format!("removing {}: {}", path.display(), e),
            }),
        }
    }
}
