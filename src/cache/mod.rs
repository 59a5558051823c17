//! Two-tier caching in front of the install
//!
//! | Tier | Directory | Key fields | Saved when |
//! |------|-----------|------------|------------|
//! | Binary | install prefix | tool, version, registry | enabled and not a hit |
//! | Store | package manager store | tool, registry | enabled |
//!
//! The binary tier only runs for pinned versions: a `latest` binary would be
//! served from cache long after a newer release.

pub mod backend;
pub mod key;
pub mod tier;

pub use backend::{CacheBackend, LocalCacheBackend};
pub use key::{KeyDeriver, KeyStyle, TierKind};
pub use tier::{CacheTier, TierPlan};
