//! Tiered cache coordination
//!
//! The two halves run in different processes: `restore` in the main step,
//! `save` in the post step. `CarriedState` is the hand-off between them.

mod restore;
mod save;

pub use restore::{AcquisitionResult, Coordinator};
pub use save::{save_tiers, SaveReport};
