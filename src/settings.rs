//! Player preferences
//!
//! Persisted separately from session saves so a new game keeps the
//! player's audio choices.

use serde::{Deserialize, Serialize};

use crate::platform::StorageBackend;

const STORAGE_KEY: &str = "brick_sling_settings";

/// Player-facing preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Master mute toggle
    pub muted: bool,
    /// Minimize shake and flash effects
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sfx_volume: 1.0,
            music_volume: 0.7,
            muted: false,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Effective sfx volume after the mute toggle
    pub fn effective_sfx_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.sfx_volume }
    }

    pub fn effective_music_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.music_volume }
    }

    /// Load preferences; missing or unreadable records fall back to defaults
    pub fn load(storage: &dyn StorageBackend) -> Self {
        if let Some(json) = storage.get(STORAGE_KEY) {
            match serde_json::from_str(&json) {
                Ok(settings) => return settings,
                Err(err) => log::warn!("discarding unreadable settings: {err}"),
            }
        }
        Self::default()
    }

    pub fn save(&self, storage: &mut dyn StorageBackend) {
        match serde_json::to_string(self) {
            Ok(json) => {
                if !storage.set(STORAGE_KEY, &json) {
                    log::warn!("settings save was dropped by storage");
                }
            }
            Err(err) => log::warn!("settings serialize failed: {err}"),
        }
    }
}
