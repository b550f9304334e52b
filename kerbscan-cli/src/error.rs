//! CLI error type.

use std::path::PathBuf;

use kerbscan::EngineError;
use thiserror::Error;

/// Errors surfaced to the terminal.
#[derive(Debug, Error)]
pub enum CliError {
    /// Config file problems (explicit `--config` path that cannot be read).
    #[error("configuration error: {0}")]
    Config(String),

    /// Snapshot file could not be read.
    #[error("failed to read snapshot {}: {source}", .path.display())]
    SnapshotRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Snapshot file is not valid JSON for a vessel.
    #[error("failed to parse snapshot {}: {source}", .path.display())]
    SnapshotParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Engine-side failures (no devices, unknown mode, ...).
    #[error(transparent)]
    Engine(#[from] EngineError),
}
