//! Player preferences
//!
//! Persisted separately from progress in LocalStorage.

use serde::{Deserialize, Serialize};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    pub muted: bool,

    // === Visual Effects ===
    /// Sparks on item pickups and hazards
    pub particles: bool,

    // === Accessibility ===
    /// Reduced motion (no blocked nudge, linear slides)
    pub reduced_motion: bool,
    /// On-screen arrows for touch devices
    pub show_touch_controls: bool,
}

/// Boolean settings that can be flipped at runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Mute,
    Particles,
    ReducedMotion,
    TouchControls,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,
            muted: false,

            particles: true,

            reduced_motion: false,
            show_touch_controls: false,
        }
    }
}

impl Settings {
    /// Volume actually applied to sound effects
    pub fn effective_sfx_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
        }
    }

    pub fn effective_music_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master_volume * self.music_volume).clamp(0.0, 1.0)
        }
    }

    /// Blocked-move nudge (respects reduced_motion)
    pub fn effective_nudge(&self) -> bool {
        !self.reduced_motion
    }

    /// Eased slide between cells (respects reduced_motion)
    pub fn effective_easing(&self) -> bool {
        !self.reduced_motion
    }

    /// On-screen pad: forced on by the setting, or once a touch was seen
    pub fn effective_touch_controls(&self, touch_seen: bool) -> bool {
        self.show_touch_controls || touch_seen
    }

    /// Flip a setting and return its new value
    pub fn toggle(&mut self, toggle: Toggle) -> bool {
        let flag = match toggle {
            Toggle::Mute => &mut self.muted,
            Toggle::Particles => &mut self.particles,
            Toggle::ReducedMotion => &mut self.reduced_motion,
            Toggle::TouchControls => &mut self.show_touch_controls,
        };
        *flag = !*flag;
        *flag
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "long_cat_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring unreadable settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                if storage.set_item(Self::STORAGE_KEY, &json).is_err() {
                    log::warn!("Failed to write settings");
                } else {
                    log::info!("Settings saved");
                }
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
