//! Session-scoped display memory.
//!
//! The scanner dialog remembers a handful of values across open/close
//! cycles within one play session: the selected display mode, the zoom
//! level, the grid-overlay visibility, and the auto-refresh toggle. The
//! caller owns one [`SessionMemory`] for the lifetime of the session and
//! passes it into controller operations; nothing here survives a program
//! restart.
//!
//! Recording and recall are gated by [`ScanSettings`] flags. The selected
//! mode is always recorded but only *recalled* when `remember_mode` is on;
//! the other three are only recorded when their flag is on, matching the
//! dialog listeners they mirror.

use crate::settings::ScanSettings;

/// Remembered dialog state for one play session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionMemory {
    /// Last selected display mode.
    pub mode: Option<String>,

    /// Last selected field-of-view value.
    pub fov: Option<f32>,

    /// Last grid-overlay visibility state.
    pub overlay: Option<String>,

    /// Last auto-refresh state.
    pub auto_refresh: Option<String>,
}

impl SessionMemory {
    /// Fresh, empty memory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a mode selection. Always stored; recall is what the
    /// `remember_mode` flag gates.
    pub fn record_mode(&mut self, mode: impl Into<String>) {
        self.mode = Some(mode.into());
    }

    /// Record a field-of-view change when `remember_fov` is on.
    pub fn record_fov(&mut self, settings: &ScanSettings, fov: f32) {
        if settings.remember_fov {
            self.fov = Some(fov);
        }
    }

    /// Record an overlay change when `remember_overlay` is on.
    pub fn record_overlay(&mut self, settings: &ScanSettings, state: impl Into<String>) {
        if settings.remember_overlay {
            self.overlay = Some(state.into());
        }
    }

    /// Record an auto-refresh change when `remember_auto_refresh` is on.
    pub fn record_auto_refresh(&mut self, settings: &ScanSettings, state: impl Into<String>) {
        if settings.remember_auto_refresh {
            self.auto_refresh = Some(state.into());
        }
    }

    /// The mode to reopen in, when remembering is enabled.
    pub fn remembered_mode(&self, settings: &ScanSettings) -> Option<&str> {
        if settings.remember_mode {
            self.mode.as_deref()
        } else {
            None
        }
    }

    /// The field-of-view value to reopen with, clamped into the resolved
    /// window.
    ///
    /// Only positive remembered values are used. Clamping applies the lower
    /// bound first, then the upper, so a malformed window with `min > max`
    /// resolves to `max` (the order the dialog applies).
    pub fn starting_fov(&self, settings: &ScanSettings, min_fov: f32, max_fov: f32) -> Option<f32> {
        if !settings.remember_fov {
            return None;
        }

        let mut fov = self.fov?;
        if fov <= 0.0 {
            return None;
        }

        if fov < min_fov {
            fov = min_fov;
        }
        if fov > max_fov {
            fov = max_fov;
        }

        Some(fov)
    }

    /// Forget everything.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
