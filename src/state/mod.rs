//! Cross-phase state
//!
//! The install and save phases run as separate processes; the carried state
//! is the only thing connecting them.

pub mod carried;
pub mod store;

pub use carried::CarriedState;
pub use store::{ActionsStateStore, FileStateStore, StateStore};

use crate::error::SetupResult;
use crate::platform::ActionsEnv;
use std::path::PathBuf;
use tracing::debug;

/// Name of the slot holding the carried state
pub const STATE_NAME: &str = "cache";

/// Pick the state store for this environment
pub fn create_store(env: &ActionsEnv, state_dir: PathBuf) -> Box<dyn StateStore> {
    match &env.state_file {
        Some(file) => Box::new(ActionsStateStore::new(file.clone())),
        None => {
            debug!("GITHUB_STATE not set, keeping state in {}", state_dir.display());
            Box::new(FileStateStore::new(state_dir))
        }
    }
}

/// Write the carried state at the end of the install phase
pub async fn persist(store: &dyn StateStore, state: &CarriedState) -> SetupResult<()> {
    store.save(STATE_NAME, &state.to_json()?).await
}

/// Read the carried state at the start of the save phase
///
/// The slot is consumed: a second load without a new persist finds nothing,
/// even when the first one could not parse what it read.
pub async fn load(store: &dyn StateStore) -> SetupResult<Option<CarriedState>> {
    let Some(json) = store.load(STATE_NAME).await? else {
        return Ok(None);
    };
    store.clear(STATE_NAME).await?;
    Ok(Some(CarriedState::from_json(&json)?))
}

/// Forget state left behind by an earlier run
pub async fn discard(store: &dyn StateStore) -> SetupResult<()> {
    store.clear(STATE_NAME).await
}
