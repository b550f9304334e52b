//! KerbScan CLI - command-line interface.
//!
//! Loads vessel snapshots, runs the aggregation engine over them, and
//! prints the unified capability view the in-game dialog would show.

mod commands;
mod error;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use kerbscan::{default_config_path, ScanSettings};
use tracing_subscriber::EnvFilter;

use crate::error::CliError;

#[derive(Debug, Parser)]
#[command(
    name = "kerbscan",
    version,
    about = "Vessel-wide KerbNet capability aggregation"
)]
struct Cli {
    /// Path to the config file (defaults to ~/.kerbscan/config.ini)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Scan a vessel snapshot and print the aggregated capability table
    Scan(commands::scan::ScanArgs),
    /// List the display modes a vessel snapshot offers
    Modes(commands::modes::ModesArgs),
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let settings = load_settings(cli.config)?;

    match cli.command {
        Command::Scan(args) => commands::scan::run(args, &settings),
        Command::Modes(args) => commands::modes::run(args),
    }
}

/// Load the settings record.
///
/// An explicit `--config` path must exist and parse; the default path is
/// optional and silently falls back to defaults.
fn load_settings(config: Option<PathBuf>) -> Result<ScanSettings, CliError> {
    match config {
        Some(path) => ScanSettings::load_from(&path)
            .map_err(|e| CliError::Config(format!("{}: {}", path.display(), e))),
        None => Ok(ScanSettings::load_from(default_config_path()).unwrap_or_default()),
    }
}
