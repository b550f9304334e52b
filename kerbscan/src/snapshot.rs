//! Vessel snapshot files.
//!
//! A snapshot is the JSON description of a vessel's scanners that the CLI
//! feeds into the engine in place of a live game session: the vessel name,
//! the planetary resource names known to the save, and one entry per
//! scanner part.
//!
//! ```json
//! {
//!   "vessel": "Kerbin Surveyor",
//!   "resources": ["Ore", "Water"],
//!   "scanners": [
//!     {
//!       "part": "SurveyScanner",
//!       "modes": ["Terrain", "Resources"],
//!       "min_fov": 5.0,
//!       "max_fov": 50.0,
//!       "anomaly_chance": 0.1
//!     }
//!   ]
//! }
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::controller::Vessel;
use crate::scanner::{ScannerAccess, ScannerSpec, StaticResourceCatalog};

/// A vessel and its scanners, as loaded from a snapshot file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VesselSnapshot {
    /// Vessel display name.
    pub vessel: String,

    /// Planetary resource names for `"Resources"` mode expansion.
    #[serde(default)]
    pub resources: Vec<String>,

    /// Scanner parts attached to the vessel, in attachment order.
    pub scanners: Vec<ScannerSpec>,
}

impl VesselSnapshot {
    /// Parse a snapshot from JSON text.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// The snapshot's resource names as a catalog for the engine.
    pub fn resource_catalog(&self) -> Arc<StaticResourceCatalog> {
        Arc::new(StaticResourceCatalog::new(self.resources.iter().cloned()))
    }
}

impl Vessel for VesselSnapshot {
    fn name(&self) -> &str {
        &self.vessel
    }

    fn scanners(&self) -> Vec<Arc<dyn ScannerAccess>> {
        self.scanners
            .iter()
            .cloned()
            .map(ScannerSpec::into_access)
            .collect()
    }
}
