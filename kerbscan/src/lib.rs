//! KerbScan - vessel-wide KerbNet scanner aggregation.
//!
//! The stock KerbNet dialog is driven by a single scanning part: its
//! field-of-view window and anomaly detection chance are whatever that one
//! device offers. KerbScan replaces that with a vessel-wide view: every
//! KerbNet-capable device is scanned, capability is grouped per display
//! mode, and the values shown to the player are chosen by a selectable
//! [`FovPolicy`]:
//!
//! - [`FovPolicy::GlobalBest`]: the best values found anywhere on the vessel
//! - [`FovPolicy::PerModeBest`]: the best values among devices supporting
//!   the selected mode
//! - [`FovPolicy::PerDevice`]: the actual window of the widest-range device
//!   for the selected mode
//!
//! The crate is a pure aggregation engine: the host game supplies devices
//! through the [`ScannerAccess`] boundary and re-triggers scans on vessel
//! events; display and persistence stay on the caller's side of the
//! [`ScannerDisplay`] and [`ScanSettings`] seams.

pub mod aggregate;
pub mod controller;
pub mod engine;
pub mod policy;
pub mod scanner;
pub mod session;
pub mod settings;
pub mod snapshot;

pub use aggregate::{GlobalBests, ModeAggregate};
pub use controller::{ScanController, ScannerDisplay, Vessel, VesselEvent};
pub use engine::{AggregationEngine, EngineError, RESOURCES_MODE};
pub use policy::{FovPolicy, ResolvedView};
pub use scanner::{PartId, ResourceCatalog, ScannerAccess, ScannerSpec, StaticResourceCatalog};
pub use session::SessionMemory;
pub use settings::{default_config_path, DifficultyPreset, ScanSettings};
pub use snapshot::VesselSnapshot;
