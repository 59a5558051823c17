//! Install phase: restore caches, install if needed, capture state

use crate::cache::{CacheBackend, CacheTier, KeyDeriver, TierPlan};
use crate::config::schema::ToolConfig;
use crate::error::{SetupError, SetupResult};
use crate::install::{Installed, Installer};
use crate::layout::Layout;
use crate::probe::Probe;
use crate::process::CommandRunner;
use crate::request::AcquisitionRequest;
use crate::retry::{retry, RetryPolicy};
use crate::state::CarriedState;
use chrono::Utc;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// What the install phase reports back to the workflow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcquisitionResult {
    /// Concrete version reported by the executable
    pub version: String,
    /// Verified executable
    pub executable: PathBuf,
    /// Whether the binary cache made the install unnecessary
    pub cache_hit: bool,
}

/// Runs the restore-then-install sequence against one backend
pub struct Coordinator<'a> {
    backend: &'a dyn CacheBackend,
    runner: &'a dyn CommandRunner,
    tool: &'a ToolConfig,
    layout: &'a Layout,
    package_manager: PathBuf,
    keys: KeyDeriver,
    retry: RetryPolicy,
}

impl<'a> Coordinator<'a> {
    pub fn new(
        backend: &'a dyn CacheBackend,
        runner: &'a dyn CommandRunner,
        tool: &'a ToolConfig,
        layout: &'a Layout,
    ) -> Self {
        Self {
            backend,
            runner,
            tool,
            layout,
            package_manager: PathBuf::from("npm"),
            keys: KeyDeriver::default(),
            retry: RetryPolicy::default(),
        }
    }

    /// Use a different package manager executable
    pub fn with_package_manager(mut self, package_manager: impl Into<PathBuf>) -> Self {
        self.package_manager = package_manager.into();
        self
    }

    /// Use a different key rendering
    pub fn with_keys(mut self, keys: KeyDeriver) -> Self {
        self.keys = keys;
        self
    }

    /// Use a different retry budget
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Acquire the tool for `request`
    ///
    /// Returns the result for the workflow and the state the save phase
    /// needs. Cache problems are logged and never fail the run; an install
    /// that cannot be completed does.
    pub async fn acquire(
        &self,
        request: &AcquisitionRequest,
    ) -> SetupResult<(AcquisitionResult, CarriedState)> {
        let mut tiers = TierPlan::for_request(
            request,
            &self.tool.package,
            &self.keys,
            self.backend.is_available(),
            self.layout.prefix.clone(),
            self.layout.store_dir.clone(),
        );

        if tiers.store.enabled {
            self.restore_store(&mut tiers.store).await;
        }

        let cached = if tiers.binary.enabled {
            self.restore_binary(&mut tiers.binary).await
        } else {
            None
        };

        let installed = match cached {
            Some(installed) => installed,
            None => self.install(request).await?,
        };

        if installed.version.trim().is_empty() {
            return Err(SetupError::VersionUnresolved {
                package: self.tool.package.clone(),
            });
        }

        let result = AcquisitionResult {
            version: installed.version.clone(),
            executable: installed.path.clone(),
            cache_hit: tiers.binary.hit,
        };
        let state = CarriedState {
            binary: tiers.binary,
            store: tiers.store,
            executable: installed.path,
            version: installed.version,
            registry: request.registry().to_string(),
            created_at: Utc::now(),
        };

        Ok((result, state))
    }

    async fn restore_store(&self, tier: &mut CacheTier) {
        match self.backend.restore(&[tier.dir.clone()], &tier.key).await {
            Ok(true) => {
                tier.hit = true;
                info!("Restored {} store cache", self.tool.package);
            }
            Ok(false) => info!("No {} store cache found, starting cold", self.tool.package),
            Err(e) => warn!("Failed to restore store cache: {}", e),
        }
    }

    /// Restore the binary tier and confirm it still works
    async fn restore_binary(&self, tier: &mut CacheTier) -> Option<Installed> {
        match self.backend.restore(&[tier.dir.clone()], &tier.key).await {
            Ok(true) => {}
            Ok(false) => {
                info!("No cached {} binary found", self.tool.package);
                return None;
            }
            Err(e) => {
                warn!("Failed to restore binary cache: {}", e);
                return None;
            }
        }

        let path = self.layout.executable(&self.tool.executable);
        match Probe::new(self.runner).version(&path).await {
            Some(version) => {
                tier.hit = true;
                info!("Using a cached version of {}: {}", self.tool.package, version);
                Some(Installed { path, version })
            }
            None => {
                warn!(
                    "Found a cached version of {} but it appears to be corrupted",
                    self.tool.package
                );
                None
            }
        }
    }

    async fn install(&self, request: &AcquisitionRequest) -> SetupResult<Installed> {
        info!(
            "Installing {} version {} from {}",
            self.tool.package,
            request.version(),
            request.registry()
        );

        let installer = Installer::new(
            self.runner,
            &self.package_manager,
            &self.tool.package,
            &self.tool.executable,
            self.layout,
        );
        let store_dir: &Path = &self.layout.store_dir;

        retry(&self.retry, |_| {
            installer.install(request.version(), request.registry(), Some(store_dir))
        })
        .await
    }
}
