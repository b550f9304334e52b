//! Per-mode capability accumulators.
//!
//! A scan folds every `(device, mode)` pair into one [`ModeAggregate`] per
//! distinct display mode, while [`GlobalBests`] tracks the running best
//! values across all modes and devices. Both are rebuilt wholesale on every
//! scan; nothing here survives a rescan.

use std::fmt;
use std::sync::Arc;

use crate::scanner::{PartId, ScannerAccess};

/// Combined capability of every device offering one display mode.
///
/// Tracks two kinds of values side by side:
///
/// - **Best-of** bounds (`best_min_fov`, `best_max_fov`,
///   `best_anomaly_chance`): the tightest minimum, widest maximum, and
///   highest anomaly chance seen across contributing devices.
/// - **Selected** bounds (`selected_min_fov`, `selected_max_fov`): the
///   actual `[min, max]` pair of the single device with the widest span,
///   never a synthetic union. Ties keep the first device encountered in
///   scan order.
///
/// The invariant `selected_max_fov - selected_min_fov == widest_range` holds
/// at all times.
#[derive(Clone)]
pub struct ModeAggregate {
    mode: String,
    best_min_fov: f32,
    best_max_fov: f32,
    best_anomaly_chance: f32,
    widest_range: f32,
    selected_min_fov: f32,
    selected_max_fov: f32,
    part: PartId,
    accessor: Arc<dyn ScannerAccess>,
}

impl ModeAggregate {
    /// Seed a new aggregate entirely from one device's values.
    pub(crate) fn seed(
        mode: impl Into<String>,
        min_fov: f32,
        max_fov: f32,
        anomaly_chance: f32,
        accessor: Arc<dyn ScannerAccess>,
    ) -> Self {
        Self {
            mode: mode.into(),
            best_min_fov: min_fov,
            best_max_fov: max_fov,
            best_anomaly_chance: anomaly_chance,
            widest_range: max_fov - min_fov,
            selected_min_fov: min_fov,
            selected_max_fov: max_fov,
            part: accessor.part(),
            accessor,
        }
    }

    /// Fold another device's values into this aggregate.
    ///
    /// Best-of bounds take the min/max/max of the existing and incoming
    /// values. The selected pair is replaced only on a strictly wider span,
    /// so the first device seen wins ties.
    pub(crate) fn fold(
        &mut self,
        min_fov: f32,
        max_fov: f32,
        anomaly_chance: f32,
        accessor: &Arc<dyn ScannerAccess>,
    ) {
        if min_fov < self.best_min_fov {
            self.best_min_fov = min_fov;
        }

        if max_fov > self.best_max_fov {
            self.best_max_fov = max_fov;
        }

        if anomaly_chance > self.best_anomaly_chance {
            self.best_anomaly_chance = anomaly_chance;
        }

        if max_fov - min_fov > self.widest_range {
            self.widest_range = max_fov - min_fov;
            self.selected_min_fov = min_fov;
            self.selected_max_fov = max_fov;
            self.part = accessor.part();
            self.accessor = Arc::clone(accessor);
        }
    }

    /// Create an alias entry carrying this aggregate's statistics under
    /// another mode name.
    pub(crate) fn alias_as(&self, mode: impl Into<String>) -> Self {
        let mut alias = self.clone();
        alias.mode = mode.into();
        alias
    }

    /// Copy every statistic from `source`, keeping this entry's mode name.
    pub(crate) fn copy_stats_from(&mut self, source: &ModeAggregate) {
        self.best_min_fov = source.best_min_fov;
        self.best_max_fov = source.best_max_fov;
        self.best_anomaly_chance = source.best_anomaly_chance;
        self.widest_range = source.widest_range;
        self.selected_min_fov = source.selected_min_fov;
        self.selected_max_fov = source.selected_max_fov;
        self.part = source.part.clone();
        self.accessor = Arc::clone(&source.accessor);
    }

    /// The display mode this aggregate describes.
    pub fn mode(&self) -> &str {
        &self.mode
    }

    /// Tightest minimum field of view across contributing devices.
    pub fn best_min_fov(&self) -> f32 {
        self.best_min_fov
    }

    /// Widest maximum field of view across contributing devices.
    pub fn best_max_fov(&self) -> f32 {
        self.best_max_fov
    }

    /// Highest anomaly chance across contributing devices.
    pub fn best_anomaly_chance(&self) -> f32 {
        self.best_anomaly_chance
    }

    /// Largest single-device field-of-view span seen for this mode.
    pub fn widest_range(&self) -> f32 {
        self.widest_range
    }

    /// Minimum field of view of the widest-range device.
    pub fn selected_min_fov(&self) -> f32 {
        self.selected_min_fov
    }

    /// Maximum field of view of the widest-range device.
    pub fn selected_max_fov(&self) -> f32 {
        self.selected_max_fov
    }

    /// Part owning the widest-range device.
    pub fn part(&self) -> &PartId {
        &self.part
    }

    /// Live handle to the widest-range device.
    pub fn accessor(&self) -> &Arc<dyn ScannerAccess> {
        &self.accessor
    }
}

impl fmt::Debug for ModeAggregate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModeAggregate")
            .field("mode", &self.mode)
            .field("best_min_fov", &self.best_min_fov)
            .field("best_max_fov", &self.best_max_fov)
            .field("best_anomaly_chance", &self.best_anomaly_chance)
            .field("widest_range", &self.widest_range)
            .field("selected_min_fov", &self.selected_min_fov)
            .field("selected_max_fov", &self.selected_max_fov)
            .field("part", &self.part)
            .finish_non_exhaustive()
    }
}

impl PartialEq for ModeAggregate {
    fn eq(&self, other: &Self) -> bool {
        self.mode == other.mode
            && self.best_min_fov == other.best_min_fov
            && self.best_max_fov == other.best_max_fov
            && self.best_anomaly_chance == other.best_anomaly_chance
            && self.widest_range == other.widest_range
            && self.selected_min_fov == other.selected_min_fov
            && self.selected_max_fov == other.selected_max_fov
            && self.part == other.part
            && Arc::ptr_eq(&self.accessor, &other.accessor)
    }
}

/// Best values across all modes and all devices of the last scan.
///
/// Zero-valued when the last scan saw no capable device at all.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GlobalBests {
    /// Tightest minimum field of view seen anywhere.
    pub best_min_fov: f32,

    /// Widest maximum field of view seen anywhere.
    pub best_max_fov: f32,

    /// Highest anomaly chance seen anywhere.
    pub best_anomaly_chance: f32,
}

impl GlobalBests {
    /// Seed from the first `(device, mode)` pair of a scan.
    pub(crate) fn seed(min_fov: f32, max_fov: f32, anomaly_chance: f32) -> Self {
        Self {
            best_min_fov: min_fov,
            best_max_fov: max_fov,
            best_anomaly_chance: anomaly_chance,
        }
    }

    /// Fold another `(device, mode)` pair into the running bests.
    pub(crate) fn fold(&mut self, min_fov: f32, max_fov: f32, anomaly_chance: f32) {
        if min_fov < self.best_min_fov {
            self.best_min_fov = min_fov;
        }

        if max_fov > self.best_max_fov {
            self.best_max_fov = max_fov;
        }

        if anomaly_chance > self.best_anomaly_chance {
            self.best_anomaly_chance = anomaly_chance;
        }
    }
}
