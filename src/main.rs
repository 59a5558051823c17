//! utoo-setup - Cache-aware utoo installer for CI
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use utoo_setup::cli::{Cli, Commands};
use utoo_setup::config::ConfigManager;
use utoo_setup::error::SetupResult;
use utoo_setup::platform::{self, ActionsEnv};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if ActionsEnv::is_actions() {
                println!("{}", platform::error_command(&e.to_string()));
            }
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> SetupResult<()> {
    let cli = Cli::parse();

    let config_manager = match cli.config {
        Some(ref path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    };
    // The save step must not fail on a bad config, so the error travels with it
    let config = config_manager.load().await.map(|mut config| {
        if let Some(dir) = cli.cache_dir {
            config.cache.backend_dir = Some(dir);
        }
        config
    });

    // Logging is the action's user interface: 0 = info, 1 = debug, 2+ = trace
    let filter = match cli.verbose {
        0 => EnvFilter::new("utoo_setup=info"),
        1 => EnvFilter::new("utoo_setup=debug"),
        _ => EnvFilter::new("utoo_setup=trace"),
    };
    let json = matches!(&config, Ok(c) if c.general.log_format == "json");
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr);
    if json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
    if let Some(path) = config_manager.path() {
        debug!("Configuration path: {}", path.display());
    }

    match cli.command {
        Commands::Install(args) => utoo_setup::cli::commands::install(args, &config?).await,
        Commands::Save => utoo_setup::cli::commands::save(config).await,
    }
}
