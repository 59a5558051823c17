//! CLI command implementations

pub mod install;
pub mod save;

pub use install::execute as install;
pub use save::execute as save;
