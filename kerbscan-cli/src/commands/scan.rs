//! `kerbscan scan` - aggregate a vessel snapshot and print the result.

use std::path::PathBuf;

use clap::Args;
use console::style;
use kerbscan::{AggregationEngine, EngineError, FovPolicy, ScanSettings, Vessel};

use crate::commands::common::{load_snapshot, PolicyArg};
use crate::error::CliError;

/// Arguments for the scan command.
#[derive(Debug, Args)]
pub struct ScanArgs {
    /// Path to the vessel snapshot JSON file
    pub snapshot: PathBuf,

    /// Override the configured FoV policy
    #[arg(long, value_enum)]
    pub policy: Option<PolicyArg>,

    /// Display mode to resolve (defaults to the first available mode)
    #[arg(long)]
    pub mode: Option<String>,
}

/// Run the scan command.
pub fn run(args: ScanArgs, settings: &ScanSettings) -> Result<(), CliError> {
    tracing::debug!(path = %args.snapshot.display(), "loading vessel snapshot");
    let snapshot = load_snapshot(&args.snapshot)?;

    let devices = snapshot.scanners();
    if !AggregationEngine::has_any_device(&devices) {
        return Err(CliError::Engine(EngineError::NoDevices));
    }

    let mut engine = AggregationEngine::with_resource_catalog(snapshot.resource_catalog());
    engine.scan(&devices);

    let policy: FovPolicy = args.policy.map(Into::into).unwrap_or(settings.policy);
    let mode = match &args.mode {
        Some(mode) => {
            engine.select_mode(mode)?;
            mode.clone()
        }
        None => engine.first_mode()?.to_string(),
    };

    print_table(&snapshot.vessel, &engine);
    print_resolved(&engine, &mode, policy)?;

    Ok(())
}

/// Print the per-mode aggregate table.
fn print_table(vessel: &str, engine: &AggregationEngine) {
    println!(
        "{} {} ({} modes)",
        style("Vessel:").bold(),
        vessel,
        engine.mode_count()
    );
    println!();
    println!(
        "{}",
        style(format!(
            "{:<14} {:>9} {:>9} {:>9} {:>11} {}",
            "MODE", "BEST MIN", "BEST MAX", "ANOMALY", "SELECTED", "PART"
        ))
        .bold()
    );

    for aggregate in engine.aggregates() {
        println!(
            "{:<14} {:>9.2} {:>9.2} {:>8.0}% {:>4.1}..{:<5.1} {}",
            aggregate.mode(),
            aggregate.best_min_fov(),
            aggregate.best_max_fov(),
            aggregate.best_anomaly_chance() * 100.0,
            aggregate.selected_min_fov(),
            aggregate.selected_max_fov(),
            aggregate.part()
        );
    }
}

/// Print the resolved view for one mode under one policy.
fn print_resolved(
    engine: &AggregationEngine,
    mode: &str,
    policy: FovPolicy,
) -> Result<(), CliError> {
    let aggregate = engine.select_mode(mode)?;
    let view = policy.resolve(aggregate, engine.global_bests());

    println!();
    println!(
        "{} {} under {}",
        style("Resolved:").bold(),
        style(mode).cyan(),
        style(policy).cyan()
    );
    println!(
        "  FoV {:.2}..{:.2}, anomaly chance {:.0}%, via {}",
        view.min_fov,
        view.max_fov,
        view.anomaly_chance * 100.0,
        view.part
    );

    let error_state = engine.error_state_of(mode)?;
    if !error_state.is_empty() {
        println!("  {} {}", style("Device error:").red().bold(), error_state);
    }

    Ok(())
}
