//! Carried state between the install and save phases

use crate::cache::CacheTier;
use crate::error::SetupResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Snapshot of the install phase's cache decisions
///
/// Written once at the end of `install`, read once by `save`. The tier keys
/// are carried rather than re-derived so both phases agree on them even when
/// the resolved version differs from the requested one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarriedState {
    /// Binary tier as it stood after restore
    pub binary: CacheTier,

    /// Store tier as it stood after restore
    pub store: CacheTier,

    /// Verified executable
    pub executable: PathBuf,

    /// Version the executable reported
    pub version: String,

    /// Registry the tool came from
    pub registry: String,

    /// When the install phase finished
    pub created_at: DateTime<Utc>,
}

impl CarriedState {
    pub fn to_json(&self) -> SetupResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> SetupResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Whether any tier has work for the save phase
    pub fn caching_enabled(&self) -> bool {
        self.binary.enabled || self.store.enabled
    }
}
