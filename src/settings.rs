//! Game settings and preferences
//!
//! Persisted in LocalStorage on the web; native builds use defaults.

use serde::{Deserialize, Serialize};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Mute when window loses focus
    pub mute_on_blur: bool,

    // === Accessibility ===
    /// Keep the background at the start color instead of shifting with progress
    pub reduced_motion: bool,
    /// Black background with bright markers
    pub high_contrast: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            show_fps: false,

            master_volume: 0.8,
            mute_on_blur: true,

            reduced_motion: false,
            high_contrast: false,
        }
    }
}

/// A single in-game change to the settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingChange {
    ToggleFps,
    ToggleMuteOnBlur,
    ToggleReducedMotion,
    ToggleHighContrast,
    VolumeUp,
    VolumeDown,
}

/// Master volume change per keypress
pub const VOLUME_STEP: f32 = 0.1;

impl Settings {
    /// Volume actually sent to the audio backend
    pub fn effective_volume(&self) -> f32 {
        self.master_volume.clamp(0.0, 1.0)
    }

    pub fn apply(&mut self, change: SettingChange) {
        match change {
            SettingChange::ToggleFps => self.show_fps = !self.show_fps,
            SettingChange::ToggleMuteOnBlur => self.mute_on_blur = !self.mute_on_blur,
            SettingChange::ToggleReducedMotion => self.reduced_motion = !self.reduced_motion,
            SettingChange::ToggleHighContrast => self.high_contrast = !self.high_contrast,
            SettingChange::VolumeUp => self.step_volume(VOLUME_STEP),
            SettingChange::VolumeDown => self.step_volume(-VOLUME_STEP),
        }
        log::info!("Settings changed: {:?}", change);
    }

    fn step_volume(&mut self, delta: f32) {
        // Round to whole steps so repeated presses land exactly on 0 and 1
        let steps = ((self.master_volume + delta) / VOLUME_STEP).round();
        self.master_volume = (steps * VOLUME_STEP).clamp(0.0, 1.0);
    }

    /// Parse stored settings, falling back to defaults for anything unreadable
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Ignoring stored settings: {}", e);
                Self::default()
            }
        }
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "pop_the_lock_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                log::info!("Loaded settings from LocalStorage");
                return Self::from_json(&json);
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
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
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
