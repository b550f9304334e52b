//! Field-of-view policy selection.
//!
//! A [`FovPolicy`] decides which of the aggregated values the display layer
//! gets to see for the selected mode: the vessel-wide bests, the bests among
//! devices supporting that mode, or the actual window of the single
//! widest-range device. Policies map onto the game's difficulty presets;
//! see [`crate::settings::DifficultyPreset`].

use serde::{Deserialize, Serialize};

use crate::aggregate::{GlobalBests, ModeAggregate};
use crate::scanner::PartId;

/// Strategy for choosing the capability values shown to the player.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FovPolicy {
    /// Best values across every mode and every device on the vessel.
    GlobalBest,

    /// Best values among the devices supporting the selected mode.
    #[default]
    PerModeBest,

    /// The exact field-of-view window of the widest-range device for the
    /// selected mode.
    PerDevice,
}

impl FovPolicy {
    /// Parse a policy from a config-file string.
    ///
    /// Accepts the kebab-case names used in snapshots and `config.ini`
    /// plus short forms.
    pub fn from_config_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "global-best" | "global" => Some(FovPolicy::GlobalBest),
            "per-mode-best" | "per-mode" => Some(FovPolicy::PerModeBest),
            "per-device" | "device" => Some(FovPolicy::PerDevice),
            _ => None,
        }
    }

    /// Player-facing description of what this policy does.
    pub fn description(&self) -> &'static str {
        match self {
            FovPolicy::GlobalBest => {
                "The best possible FoV range and anomaly scanning chance is used \
                 for all KerbNet display modes"
            }
            FovPolicy::PerModeBest => {
                "The best FoV range and anomaly scanning chance are calculated \
                 separately for each KerbNet display mode"
            }
            FovPolicy::PerDevice => {
                "Individual KerbNet scanning modules are used to set the FoV \
                 range and anomaly scanning chance for each display mode"
            }
        }
    }

    /// Compute the effective capability values for a mode under this policy.
    ///
    /// Pure and total: valid inputs always produce a view. Under
    /// [`PerDevice`](FovPolicy::PerDevice) the field-of-view window is the
    /// selected device's own pair while the anomaly chance remains the
    /// mode-wide best; anomaly detection is a capability independent of
    /// field-of-view framing. The representative part is the widest-range
    /// device under every policy.
    pub fn resolve(&self, aggregate: &ModeAggregate, globals: &GlobalBests) -> ResolvedView {
        let (min_fov, max_fov, anomaly_chance) = match self {
            FovPolicy::GlobalBest => (
                globals.best_min_fov,
                globals.best_max_fov,
                globals.best_anomaly_chance,
            ),
            FovPolicy::PerModeBest => (
                aggregate.best_min_fov(),
                aggregate.best_max_fov(),
                aggregate.best_anomaly_chance(),
            ),
            FovPolicy::PerDevice => (
                aggregate.selected_min_fov(),
                aggregate.selected_max_fov(),
                aggregate.best_anomaly_chance(),
            ),
        };

        ResolvedView {
            min_fov,
            max_fov,
            anomaly_chance,
            part: aggregate.part().clone(),
        }
    }
}

impl std::fmt::Display for FovPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FovPolicy::GlobalBest => write!(f, "global-best"),
            FovPolicy::PerModeBest => write!(f, "per-mode-best"),
            FovPolicy::PerDevice => write!(f, "per-device"),
        }
    }
}

/// Effective capability values handed to the display layer.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedView {
    /// Effective minimum field of view.
    pub min_fov: f32,

    /// Effective maximum field of view.
    pub max_fov: f32,

    /// Effective anomaly detection chance.
    pub anomaly_chance: f32,

    /// Part whose scanner represents this mode.
    pub part: PartId,
}
