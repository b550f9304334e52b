//! Scanner device boundary.
//!
//! This module defines the narrow capability surface the aggregation engine
//! requires from a scanning device. Any concrete part type can participate in
//! aggregation by adapting to [`ScannerAccess`]; the engine never looks past
//! this trait.
//!
//! Two collaborator traits live here:
//!
//! - [`ScannerAccess`]: one scanning device's stated capability
//! - [`ResourceCatalog`]: the planetary resource names used to expand the
//!   `"Resources"` display mode into per-resource overlay modes
//!
//! [`ScannerSpec`] is a plain-data implementation of [`ScannerAccess`] used by
//! the CLI (deserialized from a vessel snapshot) and by tests.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Opaque handle to the part that owns a scanner.
///
/// The engine passes part handles through to the caller without ever
/// dereferencing them; the display layer uses them to name the device a
/// capability value came from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PartId(String);

impl PartId {
    /// Create a part handle from any string-like id.
    ///
    /// # Example
    ///
    /// ```
    /// use kerbscan::scanner::PartId;
    ///
    /// let part = PartId::new("SurveyScanner.A");
    /// assert_eq!(part.as_str(), "SurveyScanner.A");
    /// ```
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw id string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PartId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Capability surface of one scanning device.
///
/// A device reports the display modes it supports plus a single field-of-view
/// window and anomaly detection chance that apply to every mode it offers.
/// Values are taken at face value: the engine performs no validation, so a
/// device reporting `min_fov() > max_fov()` is aggregated as-is.
///
/// Implementations are queried live: [`error_state`](Self::error_state) in
/// particular may change between scans, and the engine forwards the current
/// value rather than a snapshot.
pub trait ScannerAccess: Send + Sync {
    /// Display modes this device supports, in the device's own order.
    ///
    /// An empty list means the device is skipped entirely during a scan.
    fn display_modes(&self) -> Vec<String>;

    /// Narrowest field of view this device can be zoomed to.
    fn min_fov(&self) -> f32;

    /// Widest field of view this device can be zoomed to.
    fn max_fov(&self) -> f32;

    /// Chance that a scan reveals a hidden anomaly, in `[0, 1]`.
    fn anomaly_chance(&self) -> f32;

    /// Current device error state; empty string means no error.
    fn error_state(&self) -> String;

    /// Handle to the part that owns this scanner.
    fn part(&self) -> PartId;
}

/// Supplier of planetary resource names for `"Resources"` mode expansion.
///
/// The engine treats the catalog as optional: when none is configured, no
/// per-resource overlay modes are created.
pub trait ResourceCatalog: Send + Sync {
    /// All known planetary resource names. May be empty.
    fn planetary_resource_names(&self) -> Vec<String>;
}

/// A fixed, in-memory resource catalog.
///
/// Used by the CLI (names come from the vessel snapshot) and by tests.
#[derive(Debug, Clone, Default)]
pub struct StaticResourceCatalog {
    names: Vec<String>,
}

impl StaticResourceCatalog {
    /// Create a catalog from a list of resource names.
    pub fn new(names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }
}

impl ResourceCatalog for StaticResourceCatalog {
    fn planetary_resource_names(&self) -> Vec<String> {
        self.names.clone()
    }
}

/// Plain-data scanner description.
///
/// The serialized form of one scanner in a vessel snapshot. Implements
/// [`ScannerAccess`] directly so snapshots can be fed straight into the
/// engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScannerSpec {
    /// Part id owning this scanner.
    pub part: String,

    /// Display modes the scanner supports, in reported order.
    pub modes: Vec<String>,

    /// Narrowest field of view.
    pub min_fov: f32,

    /// Widest field of view.
    pub max_fov: f32,

    /// Anomaly detection chance in `[0, 1]`.
    pub anomaly_chance: f32,

    /// Device error state; empty when healthy.
    #[serde(default)]
    pub error_state: String,
}

impl ScannerSpec {
    /// Create a healthy scanner spec.
    pub fn new(
        part: impl Into<String>,
        modes: impl IntoIterator<Item = impl Into<String>>,
        min_fov: f32,
        max_fov: f32,
        anomaly_chance: f32,
    ) -> Self {
        Self {
            part: part.into(),
            modes: modes.into_iter().map(Into::into).collect(),
            min_fov,
            max_fov,
            anomaly_chance,
            error_state: String::new(),
        }
    }

    /// Set the error state.
    pub fn with_error_state(mut self, state: impl Into<String>) -> Self {
        self.error_state = state.into();
        self
    }

    /// Wrap this spec in an [`Arc`] trait object for the engine.
    pub fn into_access(self) -> Arc<dyn ScannerAccess> {
        Arc::new(self)
    }
}

impl ScannerAccess for ScannerSpec {
    fn display_modes(&self) -> Vec<String> {
        self.modes.clone()
    }

    fn min_fov(&self) -> f32 {
        self.min_fov
    }

    fn max_fov(&self) -> f32 {
        self.max_fov
    }

    fn anomaly_chance(&self) -> f32 {
        self.anomaly_chance
    }

    fn error_state(&self) -> String {
        self.error_state.clone()
    }

    fn part(&self) -> PartId {
        PartId::new(self.part.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_part_id_roundtrip() {
        let part = PartId::new("MultiSpec.1");
        assert_eq!(part.as_str(), "MultiSpec.1");
        assert_eq!(format!("{}", part), "MultiSpec.1");
    }

    #[test]
    fn test_scanner_spec_access() {
        let spec = ScannerSpec::new("SurveyScanner", ["Terrain", "Biome"], 5.0, 50.0, 0.1);

        assert_eq!(spec.display_modes(), vec!["Terrain", "Biome"]);
        assert_eq!(spec.min_fov(), 5.0);
        assert_eq!(spec.max_fov(), 50.0);
        assert_eq!(spec.anomaly_chance(), 0.1);
        assert_eq!(spec.error_state(), "");
        assert_eq!(spec.part(), PartId::new("SurveyScanner"));
    }

    #[test]
    fn test_scanner_spec_error_state() {
        let spec = ScannerSpec::new("Scanner", ["Terrain"], 1.0, 10.0, 0.0)
            .with_error_state("Signal lost");
        assert_eq!(spec.error_state(), "Signal lost");
    }

    #[test]
    fn test_scanner_spec_deserialize_defaults_error_state() {
        let json = r#"{
            "part": "SurveyScanner",
            "modes": ["Terrain"],
            "min_fov": 5.0,
            "max_fov": 50.0,
            "anomaly_chance": 0.1
        }"#;

        let spec: ScannerSpec = serde_json::from_str(json).unwrap();
        assert_eq!(spec.error_state, "");
        assert_eq!(spec.modes, vec!["Terrain"]);
    }

    #[test]
    fn test_static_resource_catalog() {
        let catalog = StaticResourceCatalog::new(["Ore", "Water"]);
        assert_eq!(catalog.planetary_resource_names(), vec!["Ore", "Water"]);

        let empty = StaticResourceCatalog::default();
        assert!(empty.planetary_resource_names().is_empty());
    }
}
