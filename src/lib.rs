//! Brick Sling - slingshot brick-breaker gameplay core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (brick grid, ball set, launch control, round state machine)
//! - `platform`: Collaborator boundaries (audio, ads, storage)
//! - `persistence`: Session checkpointing for crash/continue recovery
//! - `highscores`: Local leaderboard
//! - `config`: Data-driven game balance
//!
//! The crate owns gameplay *policy* only. Broad-phase collision detection and
//! velocity integration live in an external physics substrate that reports
//! contacts as [`sim::CollisionEvent`]s once per tick.

pub mod config;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;

pub use config::{GameConfig, RewardPolicy};
pub use highscores::Leaderboard;
pub use settings::Settings;

use glam::Vec2;

/// Engine-level constants (gameplay tuning lives in [`config::GameConfig`])
pub mod consts {
    /// Fixed simulation timestep (120 Hz, matches the frame loop's substep rate)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Ticks per second, for converting wall-clock delays to scheduled ticks
    pub const TICKS_PER_SECOND: u32 = 120;

    /// How far outside the play area a ball may drift before the
    /// off-screen grace period starts
    pub const OFFSCREEN_MARGIN: f32 = 100.0;

    /// Speeds at or below this are treated as "effectively stationary";
    /// rescaling such a vector to min speed would amplify float noise
    /// (or divide by zero), so these balls are left alone.
    pub const STALL_SPEED_EPSILON: f32 = 0.5;

    /// Number of cosmetic brick tiers (row % palette size selects one)
    pub const BRICK_PALETTE_SIZE: u32 = 6;
}

/// Rotate a vector by an angle given in degrees
#[inline]
pub fn rotate_deg(v: Vec2, degrees: f32) -> Vec2 {
    let radians = degrees.to_radians();
    let (sin, cos) = radians.sin_cos();
    Vec2::new(cos * v.x - sin * v.y, sin * v.x + cos * v.y)
}

/// Clamp a vector's magnitude to `max`, leaving shorter vectors untouched
#[inline]
pub fn clamp_magnitude(v: Vec2, max: f32) -> Vec2 {
    let len = v.length();
    if len > max { v * (max / len) } else { v }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotate_deg_quarter_turn() {
        let v = rotate_deg(Vec2::new(1.0, 0.0), 90.0);
        assert!((v.x).abs() < 1e-6);
        assert!((v.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn rotate_deg_preserves_length() {
        let v = Vec2::new(3.0, 4.0);
        let r = rotate_deg(v, 37.5);
        assert!((r.length() - 5.0).abs() < 1e-4);
    }

    #[test]
    fn clamp_magnitude_caps_long_vectors() {
        let v = clamp_magnitude(Vec2::new(30.0, 40.0), 10.0);
        assert!((v.length() - 10.0).abs() < 1e-4);
        // Direction preserved
        assert!((v.x / v.y - 0.75).abs() < 1e-4);
    }

    #[test]
    fn clamp_magnitude_leaves_short_vectors() {
        let v = Vec2::new(1.0, 2.0);
        assert_eq!(clamp_magnitude(v, 10.0), v);
    }
}
