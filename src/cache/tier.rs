//! Cache tier planning
//!
//! Decides which tiers take part in a run and what each one covers.

use crate::cache::key::{KeyDeriver, TierKind};
use crate::request::AcquisitionRequest;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One independently enabled cache scope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheTier {
    /// Which tier this is
    pub kind: TierKind,
    /// Whether the tier takes part in restore and save
    pub enabled: bool,
    /// Backend key
    pub key: String,
    /// Directory restored and saved
    pub dir: PathBuf,
    /// Whether restore produced usable content
    pub hit: bool,
}

impl CacheTier {
    fn new(kind: TierKind, enabled: bool, key: String, dir: PathBuf) -> Self {
        Self {
            kind,
            enabled,
            key,
            dir,
            hit: false,
        }
    }

    /// Whether the save phase should write this tier back
    ///
    /// The store accumulates across runs, so it is written even after a hit.
    /// A binary that came out of the cache is already there.
    pub fn should_save(&self) -> bool {
        match self.kind {
            TierKind::Store => self.enabled,
            TierKind::Binary => self.enabled && !self.hit,
        }
    }
}

/// Both tiers for one acquisition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierPlan {
    pub binary: CacheTier,
    pub store: CacheTier,
}

impl TierPlan {
    /// Plan tiers for `request`
    ///
    /// `binary_dir` is the install prefix (holding `bin/` and whatever the
    /// executables link into); `store_dir` is the package manager store.
    pub fn for_request(
        request: &AcquisitionRequest,
        tool: &str,
        keys: &KeyDeriver,
        backend_available: bool,
        binary_dir: PathBuf,
        store_dir: PathBuf,
    ) -> Self {
        let binary_enabled = request.cache_binary() && request.is_pinned() && backend_available;
        let store_enabled = request.cache_store() && backend_available;

        Self {
            binary: CacheTier::new(
                TierKind::Binary,
                binary_enabled,
                keys.binary(tool, request.version(), request.registry()),
                binary_dir,
            ),
            store: CacheTier::new(
                TierKind::Store,
                store_enabled,
                keys.store(tool, request.registry()),
                store_dir,
            ),
        }
    }
}
