//! Player preferences
//!
//! Persisted separately from best scores in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::games::Variant;
use crate::platform;

/// Player preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub volume: f32,
    pub muted: bool,
    /// Pause the game when the tab is hidden or loses focus
    pub pause_on_blur: bool,

    // === Accessibility ===
    /// Skip flashes and pop animations
    pub reduced_motion: bool,

    // === HUD ===
    pub show_fps: bool,

    /// Variant picked on the last visit
    pub last_variant: Variant,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            volume: 0.8,
            muted: false,
            pause_on_blur: true,
            reduced_motion: false,
            show_fps: false,
            last_variant: Variant::MathQuiz,
        }
    }
}

impl Settings {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "mini_arcade_settings";

    /// Volume actually applied to sound effects
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.volume.clamp(0.0, 1.0)
        }
    }

    /// Parse stored settings; malformed data falls back to defaults
    pub fn from_json(json: &str) -> Self {
        serde_json::from_str(json).unwrap_or_else(|e| {
            log::warn!("Discarding malformed settings: {}", e);
            Self::default()
        })
    }

    pub fn load() -> Self {
        match platform::read(Self::STORAGE_KEY) {
            Some(json) => {
                log::info!("Loaded settings from LocalStorage");
                Self::from_json(&json)
            }
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    pub fn save(&self) {
        match serde_json::to_string(self) {
            Ok(json) => {
                platform::write(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
            Err(e) => log::warn!("Failed to serialize settings: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mute_silences() {
        let mut settings = Settings::default();
        assert!(settings.effective_volume() > 0.0);
        settings.muted = true;
        assert_eq!(settings.effective_volume(), 0.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{ "muted": true, "last_variant": "PaintCatch" }"#);
        assert!(settings.muted);
        assert_eq!(settings.last_variant, Variant::PaintCatch);
        assert_eq!(settings.volume, Settings::default().volume);
    }

    #[test]
    fn test_malformed_json_uses_defaults() {
        assert_eq!(Settings::from_json("{{"), Settings::default());
    }
}
