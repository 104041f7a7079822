//! Presentation preferences
//!
//! Gameplay timings are fixed (see `consts`); these only change how a round
//! is shown and heard. Never persisted: on the web they come from the pitch
//! element's `data-settings` JSON attribute, natively they are the defaults.

use serde::{Deserialize, Serialize};

/// Presentation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Skip ball/keeper transition easing
    pub reduced_motion: bool,
    /// Print the power number next to the meter
    pub show_power_value: bool,

    // === Audio ===
    pub sound: bool,
    /// Master volume (0.0 - 1.0)
    pub volume: f32,

    /// Verbose logging (ignored inputs, stale timers)
    pub debug_log: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            reduced_motion: false,
            show_power_value: true,
            sound: true,
            volume: 0.8,
            debug_log: false,
        }
    }
}

impl Settings {
    /// Parse from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Settings = serde_json::from_str(json)?;
        settings.volume = settings.volume.clamp(0.0, 1.0);
        Ok(settings)
    }

    /// Parse, falling back to defaults on bad input
    pub fn from_json_or_default(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Ignoring bad settings ({}), using defaults", e);
                Self::default()
            }
        }
    }

    /// Volume actually applied to sound cues
    pub fn effective_volume(&self) -> f32 {
        if self.sound { self.volume } else { 0.0 }
    }

    pub fn log_level(&self) -> log::Level {
        if self.debug_log {
            log::Level::Debug
        } else {
            log::Level::Info
        }
    }

    /// Attribute on the pitch element holding the settings JSON
    #[cfg(target_arch = "wasm32")]
    const DATA_ATTRIBUTE: &'static str = "data-settings";

    /// Read settings from the pitch element (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load(pitch: &web_sys::Element) -> Self {
        match pitch.get_attribute(Self::DATA_ATTRIBUTE) {
            Some(json) => Self::from_json_or_default(&json),
            None => Self::default(),
        }
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}
