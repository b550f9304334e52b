//! `kerbscan modes` - list the display modes a vessel snapshot offers.

use std::path::PathBuf;

use clap::Args;
use console::style;
use kerbscan::{AggregationEngine, Vessel};

use crate::commands::common::load_snapshot;
use crate::error::CliError;

/// Arguments for the modes command.
#[derive(Debug, Args)]
pub struct ModesArgs {
    /// Path to the vessel snapshot JSON file
    pub snapshot: PathBuf,
}

/// Run the modes command.
pub fn run(args: ModesArgs) -> Result<(), CliError> {
    let snapshot = load_snapshot(&args.snapshot)?;

    let mut engine = AggregationEngine::with_resource_catalog(snapshot.resource_catalog());
    engine.scan(&snapshot.scanners());

    if engine.is_empty() {
        println!("{} has no KerbNet display modes", snapshot.vessel);
        return Ok(());
    }

    println!("{} ({} modes):", snapshot.vessel, engine.mode_count());
    for mode in engine.modes() {
        let error_state = engine.error_state_of(mode)?;
        if error_state.is_empty() {
            println!("  {}", mode);
        } else {
            println!("  {} ({})", mode, style(error_state).red());
        }
    }

    Ok(())
}
