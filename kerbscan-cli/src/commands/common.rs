//! Common types and utilities shared across CLI commands.

use std::path::Path;

use clap::ValueEnum;
use kerbscan::{FovPolicy, VesselSnapshot};

use crate::error::CliError;

/// Field-of-view policy selection for CLI arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PolicyArg {
    /// Best values across every mode and device on the vessel
    GlobalBest,
    /// Best values among devices supporting the selected mode
    PerModeBest,
    /// The exact window of the widest-range device for the selected mode
    PerDevice,
}

impl From<PolicyArg> for FovPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::GlobalBest => FovPolicy::GlobalBest,
            PolicyArg::PerModeBest => FovPolicy::PerModeBest,
            PolicyArg::PerDevice => FovPolicy::PerDevice,
        }
    }
}

/// Load a vessel snapshot from a JSON file.
pub fn load_snapshot(path: &Path) -> Result<VesselSnapshot, CliError> {
    let json = std::fs::read_to_string(path).map_err(|source| CliError::SnapshotRead {
        path: path.to_path_buf(),
        source,
    })?;

    VesselSnapshot::from_json(&json).map_err(|source| CliError::SnapshotParse {
        path: path.to_path_buf(),
        source,
    })
}
