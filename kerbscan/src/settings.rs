//! The in-game settings record and its config-file form.
//!
//! [`ScanSettings`] is read-only from the engine's perspective: the caller
//! owns it (in the game it lives in the difficulty-options screen) and
//! passes it into controller operations. The record can also be read from a
//! `config.ini` so the CLI starts with the same knobs; every key is optional
//! and falls back to its default.

use std::path::{Path, PathBuf};

use ini::Ini;

use crate::policy::FovPolicy;

/// Config-file section holding the settings record.
const SETTINGS_SECTION: &str = "kerbnet";

/// Player-tunable settings for the aggregated scanner.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanSettings {
    /// How capability values are selected for display.
    pub policy: FovPolicy,

    /// Show tooltips in the scanner dialog.
    pub show_tooltips: bool,

    /// Reopen with the last selected field-of-view value.
    pub remember_fov: bool,

    /// Reopen in the last selected display mode.
    pub remember_mode: bool,

    /// Reopen with the last grid-overlay visibility.
    pub remember_overlay: bool,

    /// Reopen with the last auto-refresh setting.
    pub remember_auto_refresh: bool,

    /// Add the map orientation toggle to the dialog.
    pub orientation_button: bool,

    /// Dialog UI scale factor.
    pub ui_scale: f32,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            policy: FovPolicy::default(),
            show_tooltips: true,
            remember_fov: false,
            remember_mode: false,
            remember_overlay: false,
            remember_auto_refresh: false,
            orientation_button: false,
            ui_scale: 1.0,
        }
    }
}

impl ScanSettings {
    /// Overwrite the policy from a difficulty preset.
    pub fn apply_preset(&mut self, preset: DifficultyPreset) {
        self.policy = preset.policy();
    }

    /// Read the settings record from a loaded INI document.
    ///
    /// Looks in the `[kerbnet]` section; unknown or malformed values fall
    /// back to the defaults rather than failing.
    pub fn from_ini(ini: &Ini) -> Self {
        let defaults = Self::default();

        let section = match ini.section(Some(SETTINGS_SECTION)) {
            Some(section) => section,
            None => return defaults,
        };

        let get_bool = |key: &str, default: bool| {
            section.get(key).and_then(parse_bool).unwrap_or(default)
        };

        Self {
            policy: section
                .get("policy")
                .and_then(FovPolicy::from_config_str)
                .unwrap_or(defaults.policy),
            show_tooltips: get_bool("show_tooltips", defaults.show_tooltips),
            remember_fov: get_bool("remember_fov", defaults.remember_fov),
            remember_mode: get_bool("remember_mode", defaults.remember_mode),
            remember_overlay: get_bool("remember_overlay", defaults.remember_overlay),
            remember_auto_refresh: get_bool(
                "remember_auto_refresh",
                defaults.remember_auto_refresh,
            ),
            orientation_button: get_bool("orientation_button", defaults.orientation_button),
            ui_scale: section
                .get("ui_scale")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.ui_scale),
        }
    }

    /// Load the settings record from an INI file on disk.
    ///
    /// Callers typically fall back to defaults when the file is missing:
    /// `ScanSettings::load_from(path).unwrap_or_default()`.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ini::Error> {
        let ini = Ini::load_from_file(path)?;
        Ok(Self::from_ini(&ini))
    }
}

/// Default location of the CLI config file, `~/.kerbscan/config.ini`.
pub fn default_config_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".kerbscan")
        .join("config.ini")
}

/// Parse the boolean spellings accepted in the config file.
fn parse_bool(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "1" => Some(true),
        "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

/// Game difficulty presets mapped onto field-of-view policies.
///
/// Easier presets hand every mode the vessel's best values; the hard preset
/// pins each mode to a single real device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DifficultyPreset {
    Easy,
    Normal,
    Moderate,
    Custom,
    Hard,
}

impl DifficultyPreset {
    /// The policy this preset selects.
    pub fn policy(self) -> FovPolicy {
        match self {
            DifficultyPreset::Easy | DifficultyPreset::Normal => FovPolicy::GlobalBest,
            DifficultyPreset::Moderate | DifficultyPreset::Custom => FovPolicy::PerModeBest,
            DifficultyPreset::Hard => FovPolicy::PerDevice,
        }
    }

    /// Player-facing description of the preset's effect.
    pub fn description(self) -> &'static str {
        self.policy().description()
    }
}
