//! Player preferences (quality, controls, accessibility)
//!
//! Stored under their own LocalStorage key in the browser; natively the
//! defaults are used.

use serde::{Deserialize, Serialize};

/// Rendering quality: particle cap and circle tessellation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Maximum live particles for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 128,
            QualityPreset::Medium => 512,
            QualityPreset::High => 2048,
        }
    }

    /// Segments used to tessellate projectile circles
    pub fn circle_segments(&self) -> u32 {
        match self {
            QualityPreset::Low => 8,
            QualityPreset::Medium => 16,
            QualityPreset::High => 24,
        }
    }
}

/// When the on-screen touch controls are active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TouchMode {
    /// On touch-capable devices only
    #[default]
    Auto,
    Always,
    Never,
}

impl TouchMode {
    pub fn enabled(&self, touch_device: bool) -> bool {
        match self {
            TouchMode::Auto => touch_device,
            TouchMode::Always => true,
            TouchMode::Never => false,
        }
    }
}

/// Keyboard bindings, as `KeyboardEvent.code` values
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub left: Vec<String>,
    pub right: Vec<String>,
    pub jump: Vec<String>,
    pub attack: Vec<String>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        let codes = |list: &[&str]| -> Vec<String> { list.iter().map(|c| c.to_string()).collect() };
        Self {
            left: codes(&["KeyA", "ArrowLeft"]),
            right: codes(&["KeyD", "ArrowRight"]),
            jump: codes(&["Space", "KeyW", "ArrowUp"]),
            attack: codes(&["KeyF", "KeyJ"]),
        }
    }
}

/// Player preferences, kept apart from progress
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub quality: QualityPreset,
    /// Hit sparks and death bursts
    pub particles: bool,
    /// Floating damage callouts
    pub damage_numbers: bool,
    pub bindings: KeyBindings,
    pub touch_mode: TouchMode,
    /// Suppresses hit flash and invulnerability blink
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::default(),
            particles: true,
            damage_numbers: true,
            bindings: KeyBindings::default(),
            touch_mode: TouchMode::default(),
            reduced_motion: false,
        }
    }
}

impl Settings {
    pub fn from_preset(preset: QualityPreset) -> Self {
        let mut settings = Self::default();
        settings.apply_preset(preset);
        settings
    }

    /// Switch preset. Low also turns off damage callouts.
    pub fn apply_preset(&mut self, preset: QualityPreset) {
        self.quality = preset;
        if preset == QualityPreset::Low {
            self.damage_numbers = false;
        }
    }

    /// Parse settings JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Effective hit flash and blink (respects reduced_motion)
    pub fn effective_flicker(&self) -> bool {
        !self.reduced_motion
    }

    /// Particle cap, zero when particles are off
    pub fn max_particles(&self) -> usize {
        if !self.particles {
            0
        } else {
            self.quality.max_particles()
        }
    }

    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "juizo_settings";

    #[cfg(target_arch = "wasm32")]
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok().flatten()
    }

    /// Stored preferences, or defaults when absent or unreadable
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let stored = Self::storage().and_then(|s| s.get_item(Self::STORAGE_KEY).ok().flatten());
        match stored.as_deref().map(Self::from_json) {
            Some(Ok(settings)) => settings,
            Some(Err(e)) => {
                log::warn!("Ignoring stored settings: {e}");
                Self::default()
            }
            None => Self::default(),
        }
    }

    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let Some(storage) = Self::storage() else {
            return;
        };
        match serde_json::to_string(self) {
            Ok(json) => {
                if storage.set_item(Self::STORAGE_KEY, &json).is_err() {
                    log::warn!("Could not write settings");
                }
            }
            Err(e) => log::warn!("Could not encode settings: {e}"),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_particle_cap_follows_quality_and_toggle() {
        let mut settings = Settings::from_preset(QualityPreset::High);
        assert_eq!(settings.max_particles(), 2048);
        settings.particles = false;
        assert_eq!(settings.max_particles(), 0);
    }

    #[test]
    fn test_low_preset_drops_damage_numbers() {
        let settings = Settings::from_preset(QualityPreset::Low);
        assert!(!settings.damage_numbers);
        assert!(Settings::from_preset(QualityPreset::Medium).damage_numbers);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{"reduced_motion": true, "touch_mode": "Always"}"#).unwrap();
        assert!(settings.reduced_motion);
        assert!(!settings.effective_flicker());
        assert_eq!(settings.touch_mode, TouchMode::Always);
        assert_eq!(settings.bindings, KeyBindings::default());
        assert!(Settings::from_json("not json").is_err());
    }

    #[test]
    fn test_touch_mode_resolution() {
        assert!(TouchMode::Auto.enabled(true));
        assert!(!TouchMode::Auto.enabled(false));
        assert!(TouchMode::Always.enabled(false));
        assert!(!TouchMode::Never.enabled(true));
    }

    #[test]
    fn test_quality_from_str() {
        assert_eq!(QualityPreset::from_str("MED"), Some(QualityPreset::Medium));
        assert_eq!(QualityPreset::from_str("ultra"), None);
        assert_eq!(QualityPreset::High.as_str(), "High");
    }
}
