//! Save command - write caches back after the job

use crate::cache::LocalCacheBackend;
use crate::config::{Config, ConfigManager};
use crate::coordinator::save_tiers;
use crate::error::SetupResult;
use crate::platform::ActionsEnv;
use crate::state;
use tracing::info;

/// Execute the save command
///
/// Runs after the job; nothing that happens here may fail it, including a
/// config file that could not be loaded.
pub async fn execute(config: SetupResult<Config>) -> SetupResult<()> {
    let outcome = match config {
        Ok(config) => save(&config).await,
        Err(e) => Err(e),
    };
    if let Err(e) = outcome {
        info!("Failed to save cache: {}", e);
    }
    Ok(())
}

async fn save(config: &Config) -> SetupResult<()> {
    let env = ActionsEnv::from_env();
    let state_dir = config
        .cache
        .state_dir
        .clone()
        .unwrap_or_else(ConfigManager::state_dir);
    let store = state::create_store(&env, state_dir);

    let Some(carried) = state::load(store.as_ref()).await? else {
        info!("No cache state found");
        return Ok(());
    };

    let backend = LocalCacheBackend::new(config.cache.backend_dir.clone());
    let report = save_tiers(&backend, &carried).await;
    info!(
        "Cache save finished: {} saved, {} failed",
        report.saved.len(),
        report.failed.len()
    );
    Ok(())
}
