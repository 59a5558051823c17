//! Save phase: write eligible tiers back to the backend

use crate::cache::{CacheBackend, CacheTier, TierKind};
use crate::state::CarriedState;
use tracing::{info, warn};

/// Outcome of the save phase, per tier
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveReport {
    pub saved: Vec<TierKind>,
    pub failed: Vec<TierKind>,
    pub skipped: Vec<TierKind>,
}

/// Save every eligible tier in `state`
///
/// Tiers are independent: a failed save is logged and the next tier is
/// still attempted.
pub async fn save_tiers(backend: &dyn CacheBackend, state: &CarriedState) -> SaveReport {
    let mut report = SaveReport::default();

    if !state.caching_enabled() {
        info!("All caching is disabled");
        return report;
    }

    for tier in [&state.binary, &state.store] {
        if !tier.should_save() {
            if tier.enabled {
                info!("Skipping {} cache save, it was restored from key {}", tier.kind, tier.key);
            }
            report.skipped.push(tier.kind);
            continue;
        }

        if save_tier(backend, tier).await {
            report.saved.push(tier.kind);
        } else {
            report.failed.push(tier.kind);
        }
    }

    report
}

async fn save_tier(backend: &dyn CacheBackend, tier: &CacheTier) -> bool {
    info!("Saving {} cache with key: {}", tier.kind, tier.key);
    match backend.save(&[tier.dir.clone()], &tier.key).await {
        Ok(()) => {
            info!("{} cache saved to {} backend", tier.kind, backend.backend_name());
            true
        }
        Err(e) => {
            warn!("Failed to save {} cache: {}", tier.kind, e);
            false
        }
    }
}
