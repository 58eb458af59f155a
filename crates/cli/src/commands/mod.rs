//! CLI command definitions and execution
//!
//! This module contains all CLI commands and their implementations. Each
//! command module exposes an Args struct and an execute function; dispatch
//! assembles the configuration and client once and shares them.

use std::path::Path;

use clap::{Parser, Subcommand};

use s3ctl_client::S3Client;
use s3ctl_core::{Config, Error, Settings};

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

pub mod completions;
mod del;
mod get;
mod la;
mod lb;
mod ls;
mod mb;
mod put;
mod rb;

/// s3ctl - S3 command-line client
///
/// A command-line interface for S3-compatible object storage services:
/// bucket management, object transfer, and listings.
#[derive(Parser, Debug)]
#[command(name = "s3ctl")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Config file path (default: the platform config directory)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<std::path::PathBuf>,

    /// Show sizes in human-readable units
    #[arg(short = 'H', long, global = true)]
    pub human_readable: bool,

    /// Print full s3:// URIs in listings
    #[arg(short = 'u', long, global = true)]
    pub show_uri: bool,

    /// Overwrite existing destinations
    #[arg(short, long, global = true)]
    pub force: bool,

    /// Enable info-level logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List all buckets
    Lb(lb::LbArgs),

    /// List objects in a bucket, or all buckets when no target is given
    Ls(ls::LsArgs),

    /// List all objects in all buckets
    La(la::LaArgs),

    /// Make a bucket
    #[command(alias = "cb")]
    Mb(mb::MbArgs),

    /// Remove a bucket
    #[command(alias = "db")]
    Rb(rb::RbArgs),

    /// Upload files into a bucket
    Put(put::PutArgs),

    /// Download an object
    Get(get::GetArgs),

    /// Delete an object
    #[command(alias = "rm")]
    Del(del::DelArgs),

    /// Generate shell completion scripts
    Completions(completions::CompletionsArgs),
}

/// Execute the CLI command and return an exit code
pub async fn execute(cli: Cli, config: Config, config_path: &Path) -> ExitCode {
    let Cli {
        human_readable,
        show_uri,
        force,
        command,
        ..
    } = cli;

    // Flags sharpen the configured defaults, never relax them.
    let mut settings = Settings::from_config(&config);
    settings.human_readable |= human_readable;
    settings.show_uri |= show_uri;
    settings.force |= force;

    let formatter = Formatter::new(OutputConfig {
        human_readable: settings.human_readable,
        show_uri: settings.show_uri,
    });

    let credentials = config.credentials();
    if credentials.access_key.is_empty() || credentials.secret_key.is_empty() {
        formatter.error(&format!(
            "No credentials configured. Add access_key and secret_key to {}",
            config_path.display()
        ));
        return ExitCode::UsageError;
    }

    let client = match S3Client::new(credentials, &settings) {
        Ok(client) => client,
        Err(e) => return report(&formatter, &e),
    };

    match command {
        Commands::Lb(args) => lb::execute(args, &client, &formatter).await,
        Commands::Ls(args) => ls::execute(args, &client, &formatter).await,
        Commands::La(args) => la::execute(args, &client, &formatter).await,
        Commands::Mb(args) => mb::execute(args, &client, &formatter).await,
        Commands::Rb(args) => rb::execute(args, &client, &formatter).await,
        Commands::Put(args) => put::execute(args, &client, &settings, &formatter).await,
        Commands::Get(args) => get::execute(args, &client, &formatter).await,
        Commands::Del(args) => del::execute(args, &client, &formatter).await,
        // Normally intercepted in main before configuration loads.
        Commands::Completions(args) => completions::execute(&args),
    }
}

/// Report an error and map it to an exit code.
pub(crate) fn report(formatter: &Formatter, err: &Error) -> ExitCode {
    formatter.error(&err.to_string());
    ExitCode::for_error(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parses() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_command_aliases() {
        let cli = Cli::try_parse_from(["s3ctl", "cb", "backups"]).unwrap();
        assert!(matches!(cli.command, Commands::Mb(_)));

        let cli = Cli::try_parse_from(["s3ctl", "db", "backups"]).unwrap();
        assert!(matches!(cli.command, Commands::Rb(_)));

        let cli = Cli::try_parse_from(["s3ctl", "rm", "s3://backups/old.log"]).unwrap();
        assert!(matches!(cli.command, Commands::Del(_)));
    }

    #[test]
    fn test_global_flags() {
        let cli =
            Cli::try_parse_from(["s3ctl", "ls", "backups", "-H", "--show-uri", "-f"]).unwrap();
        assert!(cli.human_readable);
        assert!(cli.show_uri);
        assert!(cli.force);
        assert!(!cli.debug);
    }
}
