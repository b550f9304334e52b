//! The aggregated-scanner controller.
//!
//! [`ScanController`] glues the engine to the host game: the caller owns the
//! event subscriptions (vessel switched, parts changed, situation changed)
//! and translates each notification into a [`refresh`](ScanController::refresh)
//! call; the controller rescans, re-resolves the current mode under the
//! active policy, and pushes the result to the display boundary.
//!
//! The controller itself implements [`ScannerAccess`], so the whole vessel's
//! aggregated capability can stand wherever a single scanner could: the
//! stock dialog ends up driving one "device" that is secretly every scanner
//! on the vessel.

use std::sync::Arc;

use tracing::{debug, info};

use crate::engine::{AggregationEngine, EngineError};
use crate::policy::ResolvedView;
use crate::scanner::{PartId, ScannerAccess};
use crate::session::SessionMemory;
use crate::settings::ScanSettings;

/// Host-game notification translated by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VesselEvent {
    /// The active vessel was swapped for another.
    VesselChanged,

    /// Parts were added to or removed from the vessel.
    PartsModified,

    /// The vessel's situation changed (landed, orbit, ...).
    SituationChanged,
}

/// The host vehicle model, reduced to what the controller needs.
pub trait Vessel {
    /// Vessel display name, for logging.
    fn name(&self) -> &str;

    /// Every scanner device currently attached, in the host's order.
    fn scanners(&self) -> Vec<Arc<dyn ScannerAccess>>;
}

/// The display layer's surface, as seen from the controller.
///
/// Rendering is the collaborator's business; the controller only pushes
/// resolved values through this trait.
pub trait ScannerDisplay {
    /// Set the selectable field-of-view window.
    fn set_fov_bounds(&mut self, min_fov: f32, max_fov: f32);

    /// Set the displayed anomaly detection chance.
    fn set_anomaly_chance(&mut self, chance: f32);

    /// Move the zoom slider to a specific value.
    fn set_fov_value(&mut self, fov: f32);

    /// Redraw with the current values.
    fn full_refresh(&mut self);
}

/// Drives scans and mode/policy resolution for one vessel's display dialog.
pub struct ScanController {
    engine: AggregationEngine,
    current_mode: Option<String>,
    current: Option<ResolvedView>,
    current_accessor: Option<Arc<dyn ScannerAccess>>,
    available: bool,
    open: bool,
}

impl ScanController {
    /// Create a controller around a configured engine.
    pub fn new(engine: AggregationEngine) -> Self {
        Self {
            engine,
            current_mode: None,
            current: None,
            current_accessor: None,
            available: false,
            open: false,
        }
    }

    /// Open the dialog: scan the vessel, pick a mode, resolve, display.
    ///
    /// Fails with [`EngineError::NoDevices`] when no scanner on the vessel
    /// supports any mode; the caller should disable the feature (grey out
    /// the toolbar button) rather than show an empty dialog.
    ///
    /// The remembered mode is used when `remember_mode` is set and the mode
    /// is still present after the scan; otherwise the first available mode
    /// is selected.
    pub fn open(
        &mut self,
        vessel: &dyn Vessel,
        settings: &ScanSettings,
        memory: &mut SessionMemory,
        display: &mut dyn ScannerDisplay,
    ) -> Result<(), EngineError> {
        if self.open {
            self.close();
        }

        self.rescan(vessel)?;

        let mode = match memory.remembered_mode(settings) {
            Some(remembered) if self.engine.select_mode(remembered).is_ok() => {
                remembered.to_string()
            }
            _ => self.engine.first_mode()?.to_string(),
        };

        self.apply_mode(&mode, settings)?;
        memory.record_mode(mode);

        self.open = true;
        self.update_display(settings, memory, display);

        Ok(())
    }

    /// Close the dialog. The aggregate table stays valid for queries.
    pub fn close(&mut self) {
        self.open = false;
    }

    /// Handle a host-game notification: rescan and bring the display back
    /// in line.
    ///
    /// A vessel swap closes the dialog first. When the dialog is closed the
    /// engine is still rebuilt so availability stays accurate, but nothing
    /// is displayed. If the rescan dropped the current mode, selection
    /// falls back to the first available mode.
    pub fn refresh(
        &mut self,
        vessel: &dyn Vessel,
        event: VesselEvent,
        settings: &ScanSettings,
        memory: &mut SessionMemory,
        display: &mut dyn ScannerDisplay,
    ) -> Result<(), EngineError> {
        debug!(?event, "vessel notification");

        if event == VesselEvent::VesselChanged {
            self.close();
        }

        self.rescan(vessel)?;

        if !self.open {
            return Ok(());
        }

        let mode = match &self.current_mode {
            Some(current) if self.engine.select_mode(current).is_ok() => current.clone(),
            _ => self.engine.first_mode()?.to_string(),
        };

        self.apply_mode(&mode, settings)?;
        memory.record_mode(mode);
        self.update_display(settings, memory, display);

        Ok(())
    }

    /// Switch to another display mode.
    ///
    /// Fails with [`EngineError::ModeNotFound`] for a key the last scan did
    /// not produce; callers recover by falling back to
    /// [`AggregationEngine::first_mode`].
    pub fn change_mode(
        &mut self,
        mode: &str,
        settings: &ScanSettings,
        memory: &mut SessionMemory,
        display: &mut dyn ScannerDisplay,
    ) -> Result<(), EngineError> {
        self.apply_mode(mode, settings)?;
        memory.record_mode(mode);

        if self.open {
            self.update_display(settings, memory, display);
        }

        Ok(())
    }

    /// Record a zoom change from the dialog.
    pub fn change_fov(&mut self, settings: &ScanSettings, memory: &mut SessionMemory, fov: f32) {
        if self.open {
            memory.record_fov(settings, fov);
        }
    }

    /// Record an overlay visibility change from the dialog.
    pub fn change_overlay(
        &self,
        settings: &ScanSettings,
        memory: &mut SessionMemory,
        state: &str,
    ) {
        memory.record_overlay(settings, state);
    }

    /// Record an auto-refresh change from the dialog.
    pub fn change_auto_refresh(
        &self,
        settings: &ScanSettings,
        memory: &mut SessionMemory,
        state: &str,
    ) {
        memory.record_auto_refresh(settings, state);
    }

    /// Whether the vessel currently carries any capable scanner.
    pub fn is_available(&self) -> bool {
        self.available
    }

    /// Whether the dialog is open.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// The currently selected mode, if any.
    pub fn current_mode(&self) -> Option<&str> {
        self.current_mode.as_deref()
    }

    /// The currently resolved capability view, if any.
    pub fn current_view(&self) -> Option<&ResolvedView> {
        self.current.as_ref()
    }

    /// The engine, for direct table queries.
    pub fn engine(&self) -> &AggregationEngine {
        &self.engine
    }

    /// Scan the vessel, tracking availability.
    fn rescan(&mut self, vessel: &dyn Vessel) -> Result<(), EngineError> {
        let devices = vessel.scanners();

        if !AggregationEngine::has_any_device(&devices) {
            self.available = false;
            return Err(EngineError::NoDevices);
        }

        self.available = true;
        info!(
            vessel = %vessel.name(),
            parts = devices.len(),
            "scanning vessel for KerbNet devices"
        );
        self.engine.scan(&devices);

        Ok(())
    }

    /// Resolve a mode under the active policy and make it current.
    fn apply_mode(&mut self, mode: &str, settings: &ScanSettings) -> Result<(), EngineError> {
        let aggregate = self.engine.select_mode(mode)?;
        let view = settings.policy.resolve(aggregate, self.engine.global_bests());
        let accessor = Arc::clone(aggregate.accessor());

        self.current = Some(view);
        self.current_accessor = Some(accessor);
        self.current_mode = Some(mode.to_string());

        Ok(())
    }

    /// Push the current view to the display.
    fn update_display(
        &self,
        settings: &ScanSettings,
        memory: &SessionMemory,
        display: &mut dyn ScannerDisplay,
    ) {
        let view = match &self.current {
            Some(view) => view,
            None => return,
        };

        display.set_fov_bounds(view.min_fov, view.max_fov);
        display.set_anomaly_chance(view.anomaly_chance);

        if let Some(fov) = memory.starting_fov(settings, view.min_fov, view.max_fov) {
            display.set_fov_value(fov);
        }

        display.full_refresh();
    }
}

/// The unified vessel-wide view is itself a scanner: resolved values for the
/// current mode, the full mode table, and the representative device's error
/// state.
impl ScannerAccess for ScanController {
    fn display_modes(&self) -> Vec<String> {
        self.engine.modes().iter().map(|m| m.to_string()).collect()
    }

    fn min_fov(&self) -> f32 {
        self.current.as_ref().map_or(0.0, |v| v.min_fov)
    }

    fn max_fov(&self) -> f32 {
        self.current.as_ref().map_or(0.0, |v| v.max_fov)
    }

    fn anomaly_chance(&self) -> f32 {
        self.current.as_ref().map_or(0.0, |v| v.anomaly_chance)
    }

    fn error_state(&self) -> String {
        self.current_accessor
            .as_ref()
            .map(|a| a.error_state())
            .unwrap_or_default()
    }

    fn part(&self) -> PartId {
        self.current
            .as_ref()
            .map(|v| v.part.clone())
            .unwrap_or_default()
    }
}
