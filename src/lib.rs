//! utoo-setup - Cache-aware tool acquisition for CI
//!
//! Installs a package-manager-distributed CLI on a CI worker, with a binary
//! cache and a package store cache in front of the install, and carries the
//! cache decisions from the main step to the post step.

pub mod cache;
pub mod cli;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod install;
pub mod layout;
pub mod platform;
pub mod probe;
pub mod process;
pub mod request;
pub mod retry;
pub mod state;

#[cfg(test)]
mod testing;

pub use error::{SetupError, SetupResult};
