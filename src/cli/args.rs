//! CLI argument definitions using clap derive
//!
//! Action inputs arrive as `INPUT_<NAME>` environment variables, so every
//! input flag falls back to the matching variable.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// utoo-setup - Install utoo on CI workers with caching
///
/// `install` runs as the main step and `save` as the post step of the job.
#[derive(Parser, Debug)]
#[command(name = "utoo-setup")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "UTOO_SETUP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Local cache backend directory (caching is off when unset)
    #[arg(long, global = true, env = "UTOO_SETUP_CACHE_DIR")]
    pub cache_dir: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Restore caches and install the tool if needed
    Install(InstallArgs),

    /// Save caches recorded by a previous install
    Save,
}

/// Arguments for the install command
#[derive(Parser, Debug)]
pub struct InstallArgs {
    /// Version to install (default: latest)
    #[arg(long = "tool-version", env = "INPUT_UTOO-VERSION")]
    pub tool_version: Option<String>,

    /// Registry to install from
    #[arg(long, env = "INPUT_REGISTRY")]
    pub registry: Option<String>,

    /// Cache the installed tool (pinned versions only)
    #[arg(
        long,
        env = "INPUT_CACHE-UTOO",
        default_value = "true",
        num_args = 0..=1,
        default_missing_value = "true",
        action = ArgAction::Set,
        value_parser = parse_bool_input
    )]
    pub cache_utoo: bool,

    /// Cache the package manager store
    #[arg(
        long,
        env = "INPUT_CACHE-STORE",
        default_value = "false",
        num_args = 0..=1,
        default_missing_value = "true",
        action = ArgAction::Set,
        value_parser = parse_bool_input
    )]
    pub cache_store: bool,

    /// Install prefix (overrides config)
    #[arg(long)]
    pub prefix: Option<PathBuf>,

    /// Package manager store directory (overrides config)
    #[arg(long)]
    pub store_dir: Option<PathBuf>,

    /// Package manager executable (overrides config)
    #[arg(long)]
    pub package_manager: Option<String>,
}

/// Parse a boolean input the way the Actions toolkit does
fn parse_bool_input(s: &str) -> Result<bool, String> {
    match s {
        "true" | "True" | "TRUE" => Ok(true),
        "false" | "False" | "FALSE" => Ok(false),
        _ => Err(format!(
            "`{}` is not a boolean. Use one of: true | True | TRUE | false | False | FALSE",
            s
        )),
    }
}
