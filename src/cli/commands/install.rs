//! Install command - restore caches, install if needed, record state

use crate::cache::{KeyDeriver, LocalCacheBackend};
use crate::cli::args::InstallArgs;
use crate::config::{Config, ConfigManager};
use crate::coordinator::Coordinator;
use crate::error::SetupResult;
use crate::layout::Layout;
use crate::platform::ActionsEnv;
use crate::process::SystemRunner;
use crate::request::AcquisitionRequest;
use crate::retry::RetryPolicy;
use crate::state;
use console::style;
use std::time::Duration;
use tracing::{debug, warn};

/// Execute the install command
pub async fn execute(args: InstallArgs, config: &Config) -> SetupResult<()> {
    let mut install = config.install.clone();
    if let Some(prefix) = args.prefix {
        install.prefix = Some(prefix);
    }
    if let Some(store_dir) = args.store_dir {
        install.store_dir = Some(store_dir);
    }
    if let Some(package_manager) = args.package_manager {
        install.package_manager = package_manager;
    }

    let layout = Layout::from_config(&install)?;
    layout.ensure().await?;

    let env = ActionsEnv::from_env();
    let state_dir = config
        .cache
        .state_dir
        .clone()
        .unwrap_or_else(ConfigManager::state_dir);
    let store = state::create_store(&env, state_dir);
    // A run that dies before persisting must leave nothing for the save step
    state::discard(store.as_ref()).await?;

    env.add_path(&layout.bin_dir).await?;

    let request = AcquisitionRequest::new(
        args.tool_version.as_deref(),
        args.registry.as_deref(),
        args.cache_utoo,
        args.cache_store,
    );
    debug!("Acquisition request: {:?}", request);

    let backend = LocalCacheBackend::new(config.cache.backend_dir.clone());
    let runner = SystemRunner;
    let coordinator = Coordinator::new(&backend, &runner, &config.tool, &layout)
        .with_package_manager(&install.package_manager)
        .with_keys(KeyDeriver::new(config.cache.key_style))
        .with_retry(RetryPolicy::new(
            install.retries,
            Duration::from_millis(install.retry_delay_ms),
        ));

    let (result, carried) = coordinator.acquire(&request).await?;

    if let Err(e) = state::persist(store.as_ref(), &carried).await {
        warn!("Failed to record cache state, caches will not be saved: {}", e);
    }

    let exe = &config.tool.executable;
    env.set_output(&format!("{}-version", exe), &result.version)
        .await?;
    env.set_output(
        &format!("{}-path", exe),
        &result.executable.display().to_string(),
    )
    .await?;
    env.set_output("cache-hit", &result.cache_hit.to_string())
        .await?;

    let source = if result.cache_hit { " (from cache)" } else { "" };
    eprintln!(
        "{} {} {} ready at {}{}",
        style("✓").green(),
        style(&config.tool.package).cyan(),
        result.version,
        result.executable.display(),
        source
    );

    Ok(())
}
