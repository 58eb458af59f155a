//! s3ctl - S3 command-line client
//!
//! A command-line interface for S3-compatible object storage services:
//! bucket management, object transfer, and listings.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use s3ctl_core::ConfigManager;

mod commands;
mod exit_code;
mod output;

use commands::{Cli, Commands};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Completions need no configuration and must not touch the filesystem.
    if let Commands::Completions(args) = &cli.command {
        std::process::exit(commands::completions::execute(args).as_i32());
    }

    let manager = match &cli.config {
        Some(path) => ConfigManager::with_path(path.clone()),
        None => match ConfigManager::new() {
            Ok(manager) => manager,
            Err(e) => {
                eprintln!("ERROR: {e}");
                std::process::exit(exit_code::ExitCode::for_error(&e).as_i32());
            }
        },
    };
    let config = match manager.load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("ERROR: {e}");
            std::process::exit(exit_code::ExitCode::for_error(&e).as_i32());
        }
    };

    // RUST_LOG wins over the flags; the flags win over the configured default.
    let level = if cli.debug {
        "debug"
    } else if cli.verbose {
        "info"
    } else {
        config.defaults.verbosity.as_str()
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .init();

    let exit_code = commands::execute(cli, config, manager.config_path()).await;

    std::process::exit(exit_code.as_i32());
}
