//! Platform collaborator boundaries
//!
//! Audio playback, ad networks, and storage are external to the simulation
//! core. Each boundary is a narrow trait injected at composition time; every
//! collaborator is optional and the null implementations keep a round fully
//! playable with nothing attached (degraded: silent, ad-less, unsaved).

use std::collections::HashMap;

use crate::sim::AudioCue;

/// Receives semantic sound cues, fire-and-forget
pub trait AudioSink {
    fn play(&mut self, cue: AudioCue);
}

/// Audio sink that swallows every cue (no audio device / muted build)
#[derive(Debug, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _cue: AudioCue) {}
}

/// How a rewarded ad request resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewardedOutcome {
    /// Watched to completion, grant the reward
    Rewarded,
    /// Skipped, closed early, or failed to show
    Dismissed,
}

/// Ad network boundary. Show calls return once the ad flow has resolved;
/// the state machine never assumes an ad is available.
pub trait AdGateway {
    fn is_rewarded_available(&self) -> bool;
    fn show_interstitial(&mut self);
    fn show_rewarded(&mut self) -> RewardedOutcome;
}

/// Gateway for builds without an ad network: nothing is ever available
/// and rewarded requests resolve as immediate dismissals.
#[derive(Debug, Default)]
pub struct NoAds;

impl AdGateway for NoAds {
    fn is_rewarded_available(&self) -> bool {
        false
    }

    fn show_interstitial(&mut self) {}

    fn show_rewarded(&mut self) -> RewardedOutcome {
        RewardedOutcome::Dismissed
    }
}

/// Key-value persistence boundary (LocalStorage on web)
pub trait StorageBackend {
    fn get(&self, key: &str) -> Option<String>;
    /// Returns false if the write was lost (storage full / unavailable)
    fn set(&mut self, key: &str, value: &str) -> bool;
    fn remove(&mut self, key: &str);
}

/// In-memory backend for native builds and tests
#[derive(Debug, Default)]
pub struct MemoryStorage {
    map: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.map.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> bool {
        self.map.insert(key.to_string(), value.to_string());
        true
    }

    fn remove(&mut self, key: &str) {
        self.map.remove(key);
    }
}

/// Browser LocalStorage backend
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default)]
pub struct LocalStorage;

#[cfg(target_arch = "wasm32")]
impl StorageBackend for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        let storage = web_sys::window().and_then(|w| w.local_storage().ok()).flatten()?;
        storage.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) -> bool {
        let Some(storage) = web_sys::window().and_then(|w| w.local_storage().ok()).flatten()
        else {
            log::warn!("LocalStorage unavailable, dropping write to {key}");
            return false;
        };
        storage.set_item(key, value).is_ok()
    }

    fn remove(&mut self, key: &str) {
        if let Some(storage) = web_sys::window().and_then(|w| w.local_storage().ok()).flatten() {
            let _ = storage.remove_item(key);
        }
    }
}

/// Wall-clock milliseconds since the Unix epoch (leaderboard timestamps)
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as f64)
        .unwrap_or(0.0)
}

/// Initialize logging for the current platform. Call once from the embedder.
#[cfg(target_arch = "wasm32")]
pub fn init_logging() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}

/// Wasm entry point, run on module instantiation. Routes panics and logs
/// to the console before the embedder makes its first call.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn wasm_main() {
    init_logging();
}

#[cfg(not(target_arch = "wasm32"))]
pub fn init_logging() {
    let _ = env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .try_init();
}
