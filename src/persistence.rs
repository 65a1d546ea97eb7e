//! Session persistence
//!
//! The session counters are checkpointed after every run-state change worth
//! surviving a crash or tab close (level advance, pull spent, game over).
//! Saves are a versioned JSON envelope; anything unreadable or from an
//! unknown version is discarded rather than guessed at.

use serde::{Deserialize, Serialize};

use crate::platform::StorageBackend;
use crate::sim::SessionState;

/// Current envelope version
pub const SAVE_VERSION: u32 = 1;

const SESSION_KEY: &str = "brick_sling_session";
const HIGH_SCORE_KEY: &str = "brick_sling_high_score";

#[derive(Debug, Serialize, Deserialize)]
struct SessionEnvelope {
    version: u32,
    session: SessionState,
}

/// Persist the session counters. Best effort; a dropped write is logged.
pub fn save_session(storage: &mut dyn StorageBackend, session: &SessionState) {
    let envelope = SessionEnvelope { version: SAVE_VERSION, session: session.clone() };
    match serde_json::to_string(&envelope) {
        Ok(json) => {
            if !storage.set(SESSION_KEY, &json) {
                log::warn!("session checkpoint was dropped by storage");
            }
        }
        Err(err) => log::warn!("session serialize failed: {err}"),
    }
}

/// Load the persisted session, if a readable current-version one exists
pub fn load_session(storage: &dyn StorageBackend) -> Option<SessionState> {
    let json = storage.get(SESSION_KEY)?;
    let envelope: SessionEnvelope = match serde_json::from_str(&json) {
        Ok(envelope) => envelope,
        Err(err) => {
            log::warn!("discarding corrupt session save: {err}");
            return None;
        }
    };
    if envelope.version != SAVE_VERSION {
        log::warn!(
            "discarding session save from version {} (current {SAVE_VERSION})",
            envelope.version
        );
        return None;
    }
    Some(envelope.session)
}

/// Remove the persisted session (explicit new game)
pub fn clear_session(storage: &mut dyn StorageBackend) {
    storage.remove(SESSION_KEY);
}

/// Standalone high score record, kept separate from the session so it
/// survives a session clear
pub fn load_high_score(storage: &dyn StorageBackend) -> u64 {
    storage
        .get(HIGH_SCORE_KEY)
        .and_then(|s| s.parse().ok())
        .unwrap_or(0)
}

pub fn save_high_score(storage: &mut dyn StorageBackend, score: u64) {
    if !storage.set(HIGH_SCORE_KEY, &score.to_string()) {
        log::warn!("high score save was dropped by storage");
    }
}
