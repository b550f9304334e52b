//! Vessel-wide scanner aggregation.
//!
//! [`AggregationEngine`] scans every KerbNet-capable device on a vessel and
//! builds one [`ModeAggregate`] per distinct display mode, together with the
//! [`GlobalBests`] across all modes. The table is rebuilt from scratch on
//! every scan; callers re-invoke [`AggregationEngine::scan`] whenever the
//! vessel or its parts change.
//!
//! # Resource overlay aliases
//!
//! The mode literally named `"Resources"` is special: when a
//! [`ResourceCatalog`] is configured, the engine adds one alias entry per
//! known planetary resource name, each carrying the same statistics as the
//! `"Resources"` aggregate. Per-resource overlay modes thereby inherit the
//! generic resource scanner's capability without independent tracking.
//!
//! # Ordering
//!
//! Devices are processed in the order the caller supplies them, and a
//! device's modes in the order the device reports them. The only
//! order-sensitive outcome is the widest-range tie-break, which keeps the
//! first winner encountered; everything else is min/max folding.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::aggregate::{GlobalBests, ModeAggregate};
use crate::scanner::{ResourceCatalog, ScannerAccess};

/// The display mode expanded into per-resource overlay aliases.
pub const RESOURCES_MODE: &str = "Resources";

/// Errors surfaced by engine queries.
///
/// All of these are recoverable: a missing mode falls back to
/// [`AggregationEngine::first_mode`], and an empty table means the caller
/// disables the feature rather than displaying empty data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The requested display mode is not in the current table, e.g. a
    /// remembered mode that a rescan dropped.
    #[error("display mode not found: {0}")]
    ModeNotFound(String),

    /// The aggregate table is empty; no scan has run or the last scan found
    /// nothing.
    #[error("no display modes available")]
    NoModesAvailable,

    /// The device list contained no scanner supporting any mode.
    #[error("vessel has no KerbNet-capable devices")]
    NoDevices,
}

/// Aggregates scanner capability across a whole vessel.
///
/// The engine has two states: *empty* (no scan yet, or the last scan found
/// no capable device) and *populated*. [`scan`](Self::scan) always performs
/// a full rebuild; there is no incremental update.
#[derive(Default)]
pub struct AggregationEngine {
    table: BTreeMap<String, ModeAggregate>,
    globals: GlobalBests,
    catalog: Option<Arc<dyn ResourceCatalog>>,
}

impl AggregationEngine {
    /// Create an engine without resource alias expansion.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine that expands `"Resources"` into per-resource aliases
    /// using the given catalog.
    pub fn with_resource_catalog(catalog: Arc<dyn ResourceCatalog>) -> Self {
        Self {
            table: BTreeMap::new(),
            globals: GlobalBests::default(),
            catalog: Some(catalog),
        }
    }

    /// Check whether any device in the list supports at least one mode.
    ///
    /// Cheap existence test used to decide feature availability before
    /// committing to a full scan; builds no table.
    pub fn has_any_device(devices: &[Arc<dyn ScannerAccess>]) -> bool {
        devices.iter().any(|d| !d.display_modes().is_empty())
    }

    /// Rebuild the aggregate table and global bests from the given devices.
    ///
    /// Devices with no supported modes are skipped. An empty device list
    /// yields an empty table and zero-valued globals. Device data is taken
    /// as-is; a device reporting `min_fov > max_fov` is folded without
    /// validation.
    pub fn scan(&mut self, devices: &[Arc<dyn ScannerAccess>]) {
        self.table.clear();

        let mut globals: Option<GlobalBests> = None;

        for access in devices {
            for mode in access.display_modes() {
                let min_fov = access.min_fov();
                let max_fov = access.max_fov();
                let anomaly = access.anomaly_chance();

                match globals.as_mut() {
                    Some(g) => g.fold(min_fov, max_fov, anomaly),
                    None => globals = Some(GlobalBests::seed(min_fov, max_fov, anomaly)),
                }

                let created = match self.table.entry(mode.clone()) {
                    Entry::Occupied(mut occupied) => {
                        occupied.get_mut().fold(min_fov, max_fov, anomaly, access);
                        false
                    }
                    Entry::Vacant(vacant) => {
                        let seeded = ModeAggregate::seed(
                            vacant.key().clone(),
                            min_fov,
                            max_fov,
                            anomaly,
                            Arc::clone(access),
                        );
                        vacant.insert(seeded);
                        true
                    }
                };

                if mode == RESOURCES_MODE {
                    if created {
                        self.add_resource_aliases();
                    } else {
                        self.refresh_resource_aliases();
                    }
                }
            }
        }

        // A device may fold into a resource-named key after the last
        // "Resources" update; a final refresh keeps every alias identical to
        // the source aggregate.
        if self.table.contains_key(RESOURCES_MODE) {
            self.refresh_resource_aliases();
        }

        self.globals = globals.unwrap_or_default();

        debug!(modes = self.table.len(), "aggregate table rebuilt");
    }

    /// Look up the aggregate for a display mode.
    pub fn select_mode(&self, mode: &str) -> Result<&ModeAggregate, EngineError> {
        self.table
            .get(mode)
            .ok_or_else(|| EngineError::ModeNotFound(mode.to_string()))
    }

    /// First mode in table order, the fallback when a remembered mode is
    /// gone.
    pub fn first_mode(&self) -> Result<&str, EngineError> {
        self.table
            .keys()
            .next()
            .map(String::as_str)
            .ok_or(EngineError::NoModesAvailable)
    }

    /// All mode keys in table order, for populating a mode selector.
    pub fn modes(&self) -> Vec<&str> {
        self.table.keys().map(String::as_str).collect()
    }

    /// Iterate the aggregates in table order.
    pub fn aggregates(&self) -> impl Iterator<Item = &ModeAggregate> {
        self.table.values()
    }

    /// Current error state of the representative device for a mode.
    ///
    /// Forwards the device's live state at query time; an empty string means
    /// no error.
    pub fn error_state_of(&self, mode: &str) -> Result<String, EngineError> {
        self.select_mode(mode)
            .map(|aggregate| aggregate.accessor().error_state())
    }

    /// Best values across all modes and devices of the last scan.
    pub fn global_bests(&self) -> &GlobalBests {
        &self.globals
    }

    /// True when no scan has run yet or the last scan found nothing.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Number of modes in the table, aliases included.
    pub fn mode_count(&self) -> usize {
        self.table.len()
    }

    /// Insert alias entries for every catalog resource name not already in
    /// the table, seeded from the current `"Resources"` aggregate.
    fn add_resource_aliases(&mut self) {
        let names = match &self.catalog {
            Some(catalog) => catalog.planetary_resource_names(),
            None => return,
        };

        let source = match self.table.get(RESOURCES_MODE) {
            Some(source) => source.clone(),
            None => return,
        };

        for name in names {
            if name.is_empty() {
                continue;
            }

            if !self.table.contains_key(&name) {
                let alias = source.alias_as(name.clone());
                self.table.insert(name, alias);
            }
        }
    }

    /// Copy the current `"Resources"` statistics into every resource-named
    /// entry already in the table.
    fn refresh_resource_aliases(&mut self) {
        let names = match &self.catalog {
            Some(catalog) => catalog.planetary_resource_names(),
            None => return,
        };

        let source = match self.table.get(RESOURCES_MODE) {
            Some(source) => source.clone(),
            None => return,
        };

        for name in names {
            if name.is_empty() || name == RESOURCES_MODE {
                continue;
            }

            if let Some(entry) = self.table.get_mut(&name) {
                entry.copy_stats_from(&source);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use proptest::prelude::*;

    use super::*;
    use crate::scanner::{PartId, ScannerSpec, StaticResourceCatalog};

    fn device(
        part: &str,
        modes: &[&str],
        min: f32,
        max: f32,
        anomaly: f32,
    ) -> Arc<dyn ScannerAccess> {
        ScannerSpec::new(part, modes.iter().copied(), min, max, anomaly).into_access()
    }

    /// Scanner whose error state can change between queries.
    struct FlakyScanner {
        state: Mutex<String>,
    }

    impl FlakyScanner {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                state: Mutex::new(String::new()),
            })
        }

        fn set_state(&self, state: &str) {
            *self.state.lock().unwrap() = state.to_string();
        }
    }

    impl ScannerAccess for FlakyScanner {
        fn display_modes(&self) -> Vec<String> {
            vec!["Terrain".to_string()]
        }

        fn min_fov(&self) -> f32 {
            5.0
        }

        fn max_fov(&self) -> f32 {
            50.0
        }

        fn anomaly_chance(&self) -> f32 {
            0.1
        }

        fn error_state(&self) -> String {
            self.state.lock().unwrap().clone()
        }

        fn part(&self) -> PartId {
            PartId::new("FlakyScanner")
        }
    }

    #[test]
    fn test_scan_builds_one_aggregate_per_mode() {
        let mut engine = AggregationEngine::new();
        engine.scan(&[
            device("A", &["Terrain", "Biome"], 5.0, 50.0, 0.1),
            device("B", &["Terrain"], 2.0, 30.0, 0.3),
        ]);

        assert_eq!(engine.modes(), vec!["Biome", "Terrain"]);

        let terrain = engine.select_mode("Terrain").unwrap();
        assert_eq!(terrain.best_min_fov(), 2.0);
        assert_eq!(terrain.best_max_fov(), 50.0);

        let biome = engine.select_mode("Biome").unwrap();
        assert_eq!(biome.best_min_fov(), 5.0);
        assert_eq!(biome.part(), &PartId::new("A"));
    }

    #[test]
    fn test_scan_matches_reference_scenario() {
        // Two terrain scanners: A (5..50, 0.1) then B (2..30, 0.3).
        let mut engine = AggregationEngine::new();
        engine.scan(&[
            device("A", &["Terrain"], 5.0, 50.0, 0.1),
            device("B", &["Terrain"], 2.0, 30.0, 0.3),
        ]);

        let terrain = engine.select_mode("Terrain").unwrap();
        assert_eq!(terrain.best_min_fov(), 2.0);
        assert_eq!(terrain.best_max_fov(), 50.0);
        assert_eq!(terrain.best_anomaly_chance(), 0.3);
        assert_eq!(terrain.widest_range(), 45.0);
        assert_eq!(terrain.selected_min_fov(), 5.0);
        assert_eq!(terrain.selected_max_fov(), 50.0);
        assert_eq!(terrain.part(), &PartId::new("A"));
    }

    #[test]
    fn test_scan_skips_devices_without_modes() {
        let mut engine = AggregationEngine::new();
        engine.scan(&[
            device("Mute", &[], 0.0, 100.0, 1.0),
            device("A", &["Terrain"], 5.0, 50.0, 0.1),
        ]);

        assert_eq!(engine.mode_count(), 1);
        // The mute device contributes nothing, not even to globals.
        assert_eq!(engine.global_bests().best_max_fov, 50.0);
        assert_eq!(engine.global_bests().best_anomaly_chance, 0.1);
    }

    #[test]
    fn test_empty_scan_yields_empty_state() {
        let mut engine = AggregationEngine::new();
        engine.scan(&[]);

        assert!(engine.is_empty());
        assert_eq!(engine.global_bests(), &GlobalBests::default());
        assert_eq!(engine.first_mode(), Err(EngineError::NoModesAvailable));
        assert!(engine.modes().is_empty());
    }

    #[test]
    fn test_has_any_device() {
        assert!(!AggregationEngine::has_any_device(&[]));
        assert!(!AggregationEngine::has_any_device(&[device(
            "Mute",
            &[],
            0.0,
            1.0,
            0.0
        )]));
        assert!(AggregationEngine::has_any_device(&[
            device("Mute", &[], 0.0, 1.0, 0.0),
            device("A", &["Terrain"], 5.0, 50.0, 0.1),
        ]));
    }

    #[test]
    fn test_select_mode_unknown_key() {
        let mut engine = AggregationEngine::new();
        engine.scan(&[device("A", &["Terrain"], 5.0, 50.0, 0.1)]);

        assert_eq!(
            engine.select_mode("Resources"),
            Err(EngineError::ModeNotFound("Resources".to_string()))
        );
    }

    #[test]
    fn test_rescan_drops_stale_modes() {
        let mut engine = AggregationEngine::new();
        engine.scan(&[device("A", &["Terrain", "Biome"], 5.0, 50.0, 0.1)]);
        assert!(engine.select_mode("Biome").is_ok());

        engine.scan(&[device("B", &["Terrain"], 2.0, 30.0, 0.3)]);
        assert_eq!(
            engine.select_mode("Biome"),
            Err(EngineError::ModeNotFound("Biome".to_string()))
        );

        // The fallback still lands on a valid key.
        assert_eq!(engine.first_mode(), Ok("Terrain"));
    }

    #[test]
    fn test_rescan_over_empty_list_empties_the_engine() {
        let mut engine = AggregationEngine::new();
        engine.scan(&[device("A", &["Terrain"], 5.0, 50.0, 0.1)]);
        assert!(!engine.is_empty());

        engine.scan(&[]);
        assert!(engine.is_empty());
        assert_eq!(engine.global_bests(), &GlobalBests::default());
    }

    #[test]
    fn test_globals_span_all_modes() {
        let mut engine = AggregationEngine::new();
        engine.scan(&[
            device("A", &["Terrain"], 5.0, 50.0, 0.1),
            device("B", &["Biome"], 2.0, 30.0, 0.3),
            device("C", &["Altimetry"], 8.0, 70.0, 0.05),
        ]);

        let globals = engine.global_bests();
        assert_eq!(globals.best_min_fov, 2.0);
        assert_eq!(globals.best_max_fov, 70.0);
        assert_eq!(globals.best_anomaly_chance, 0.3);
    }

    #[test]
    fn test_widest_range_tie_break_is_first_seen() {
        let mut engine = AggregationEngine::new();
        engine.scan(&[
            device("A", &["Terrain"], 5.0, 50.0, 0.1),
            device("B", &["Terrain"], 10.0, 55.0, 0.1),
        ]);

        let terrain = engine.select_mode("Terrain").unwrap();
        assert_eq!(terrain.part(), &PartId::new("A"));
    }

    #[test]
    fn test_error_state_is_forwarded_live() {
        let flaky = FlakyScanner::new();
        let access: Arc<dyn ScannerAccess> = flaky.clone();
        let mut engine = AggregationEngine::new();
        engine.scan(&[access]);

        assert_eq!(engine.error_state_of("Terrain"), Ok(String::new()));

        flaky.set_state("Signal blocked");
        assert_eq!(
            engine.error_state_of("Terrain"),
            Ok("Signal blocked".to_string())
        );

        assert_eq!(
            engine.error_state_of("Biome"),
            Err(EngineError::ModeNotFound("Biome".to_string()))
        );
    }

    #[test]
    fn test_resource_aliases_created_from_catalog() {
        let catalog = Arc::new(StaticResourceCatalog::new(["Ore", "Water"]));
        let mut engine = AggregationEngine::with_resource_catalog(catalog);
        engine.scan(&[device("R", &["Resources"], 3.0, 40.0, 0.2)]);

        assert_eq!(engine.modes(), vec!["Ore", "Resources", "Water"]);

        let source = engine.select_mode("Resources").unwrap();
        for alias in ["Ore", "Water"] {
            let entry = engine.select_mode(alias).unwrap();
            assert_eq!(entry.best_min_fov(), source.best_min_fov());
            assert_eq!(entry.best_max_fov(), source.best_max_fov());
            assert_eq!(entry.best_anomaly_chance(), source.best_anomaly_chance());
            assert_eq!(entry.selected_min_fov(), source.selected_min_fov());
            assert_eq!(entry.selected_max_fov(), source.selected_max_fov());
            assert_eq!(entry.part(), source.part());
        }
    }

    #[test]
    fn test_resource_aliases_track_later_updates() {
        let catalog = Arc::new(StaticResourceCatalog::new(["Ore"]));
        let mut engine = AggregationEngine::with_resource_catalog(catalog);
        engine.scan(&[
            device("R1", &["Resources"], 3.0, 40.0, 0.2),
            device("R2", &["Resources"], 1.0, 90.0, 0.6),
        ]);

        let ore = engine.select_mode("Ore").unwrap();
        assert_eq!(ore.best_min_fov(), 1.0);
        assert_eq!(ore.best_max_fov(), 90.0);
        assert_eq!(ore.best_anomaly_chance(), 0.6);
        assert_eq!(ore.part(), &PartId::new("R2"));
    }

    #[test]
    fn test_no_catalog_means_no_aliases() {
        let mut engine = AggregationEngine::new();
        engine.scan(&[device("R", &["Resources"], 3.0, 40.0, 0.2)]);

        assert_eq!(engine.modes(), vec!["Resources"]);
    }

    #[test]
    fn test_empty_resource_names_are_skipped() {
        let catalog = Arc::new(StaticResourceCatalog::new(["", "Ore"]));
        let mut engine = AggregationEngine::with_resource_catalog(catalog);
        engine.scan(&[device("R", &["Resources"], 3.0, 40.0, 0.2)]);

        assert_eq!(engine.modes(), vec!["Ore", "Resources"]);
    }

    #[test]
    fn test_resource_named_mode_ends_up_mirroring_the_source() {
        // "Ore" is both a real device mode and a catalog resource; after the
        // scan it mirrors the "Resources" aggregate like any other alias.
        let catalog = Arc::new(StaticResourceCatalog::new(["Ore"]));
        let mut engine = AggregationEngine::with_resource_catalog(catalog);
        engine.scan(&[
            device("OreScanner", &["Ore"], 10.0, 20.0, 0.9),
            device("R", &["Resources"], 3.0, 40.0, 0.2),
        ]);

        let source = engine.select_mode("Resources").unwrap().clone();
        let ore = engine.select_mode("Ore").unwrap();
        assert_eq!(ore.best_min_fov(), source.best_min_fov());
        assert_eq!(ore.best_max_fov(), source.best_max_fov());
        assert_eq!(ore.best_anomaly_chance(), source.best_anomaly_chance());
        assert_eq!(ore.part(), source.part());
    }

    // ─────────────────────────────────────────────────────────────────────
    // Property-based tests
    // ─────────────────────────────────────────────────────────────────────

    const MODE_POOL: &[&str] = &["Terrain", "Biome", "Resources", "Altimetry"];

    fn arb_devices() -> impl Strategy<Value = Vec<ScannerSpec>> {
        prop::collection::vec(
            (
                0.0f32..90.0,
                0.0f32..90.0,
                0.0f32..1.0,
                prop::collection::vec(0usize..MODE_POOL.len(), 0..4),
            ),
            0..6,
        )
        .prop_map(|raw| {
            raw.into_iter()
                .enumerate()
                .map(|(i, (min, max, anomaly, mode_idx))| {
                    let modes: Vec<&str> = mode_idx.into_iter().map(|m| MODE_POOL[m]).collect();
                    ScannerSpec::new(format!("part-{}", i), modes, min, max, anomaly)
                })
                .collect()
        })
    }

    proptest! {
        /// Per-mode bests bound every contributing device's values.
        #[test]
        fn prop_bests_are_monotonic(specs in arb_devices()) {
            let devices: Vec<Arc<dyn ScannerAccess>> =
                specs.iter().cloned().map(ScannerSpec::into_access).collect();

            let mut engine = AggregationEngine::new();
            engine.scan(&devices);

            for spec in &specs {
                for mode in &spec.modes {
                    let aggregate = engine.select_mode(mode).unwrap();
                    prop_assert!(aggregate.best_min_fov() <= spec.min_fov);
                    prop_assert!(aggregate.best_max_fov() >= spec.max_fov);
                    prop_assert!(aggregate.best_anomaly_chance() >= spec.anomaly_chance);
                }
            }
        }

        /// Rescanning an unchanged device list reproduces the same table and
        /// globals.
        #[test]
        fn prop_rescan_is_idempotent(specs in arb_devices()) {
            let devices: Vec<Arc<dyn ScannerAccess>> =
                specs.iter().cloned().map(ScannerSpec::into_access).collect();

            let mut engine = AggregationEngine::new();
            engine.scan(&devices);
            let first_modes: Vec<String> =
                engine.modes().iter().map(|m| m.to_string()).collect();
            let first_table: Vec<ModeAggregate> =
                engine.aggregates().cloned().collect();
            let first_globals = *engine.global_bests();

            engine.scan(&devices);
            let second_modes: Vec<String> =
                engine.modes().iter().map(|m| m.to_string()).collect();
            let second_table: Vec<ModeAggregate> =
                engine.aggregates().cloned().collect();

            prop_assert_eq!(first_modes, second_modes);
            prop_assert_eq!(first_table, second_table);
            prop_assert_eq!(first_globals, *engine.global_bests());
        }

        /// Every alias entry mirrors the "Resources" aggregate after a scan.
        #[test]
        fn prop_aliases_mirror_resources(specs in arb_devices()) {
            let devices: Vec<Arc<dyn ScannerAccess>> =
                specs.iter().cloned().map(ScannerSpec::into_access).collect();

            let catalog = Arc::new(StaticResourceCatalog::new(["Ore", "Water", "XenonGas"]));
            let mut engine = AggregationEngine::with_resource_catalog(catalog);
            engine.scan(&devices);

            if let Ok(source) = engine.select_mode(RESOURCES_MODE) {
                let source = source.clone();
                for alias in ["Ore", "Water", "XenonGas"] {
                    let entry = engine.select_mode(alias).unwrap();
                    prop_assert_eq!(entry.best_min_fov(), source.best_min_fov());
                    prop_assert_eq!(entry.best_max_fov(), source.best_max_fov());
                    prop_assert_eq!(
                        entry.best_anomaly_chance(),
                        source.best_anomaly_chance()
                    );
                    prop_assert_eq!(entry.selected_min_fov(), source.selected_min_fov());
                    prop_assert_eq!(entry.selected_max_fov(), source.selected_max_fov());
                    prop_assert_eq!(entry.part(), source.part());
                }
            }
        }
    }
}
