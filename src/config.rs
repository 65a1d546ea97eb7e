//! Game balance configuration
//!
//! The two original engine ports of this game diverged on several constants
//! (brick counts, speed bounds). This struct is the single source of truth;
//! defaults are the reference configuration. Serializable so a tuning file
//! can override any field.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// What a rewarded ad grants when the player continues after game over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RewardPolicy {
    /// Restore the active round: the grid backs off one row and the
    /// ball pool refills. The run keeps its level and score.
    #[default]
    GridAscent,
    /// Grant extra balls for future launches instead of in-round relief
    BonusBalls { count: u32 },
}

/// Full gameplay tuning set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    // === Play area ===
    /// Logical play area size (portrait)
    pub play_width: f32,
    pub play_height: f32,
    /// Fixed point balls launch from
    pub launch_point: Vec2,
    /// Constant acceleration applied in the trajectory preview
    /// (zero for this game; kept so the preview formula stays ballistic)
    pub gravity: Vec2,

    // === Balls ===
    pub ball_radius: f32,
    /// Speed bounds enforced after every collision and tick
    pub min_speed: f32,
    pub max_speed: f32,
    /// Ticks between consecutive spawns in a multi-ball launch
    pub launch_delay_ticks: u32,
    /// Ticks an off-screen ball survives before it counts as returned
    pub offscreen_grace_ticks: u32,
    /// Bounce jitter half-angle on brick hits, degrees
    pub brick_jitter_deg: f32,
    /// Bounce jitter half-angle on wall hits, degrees
    pub wall_jitter_deg: f32,

    // === Drag / launch gesture ===
    /// Drag vector magnitude cap
    pub max_drag_distance: f32,
    /// Drags shorter than this are taps and do not launch
    pub min_drag_distance: f32,
    /// Drag vector to launch velocity scale
    pub drag_multiplier: f32,
    /// Trajectory preview sample count and spacing (seconds)
    pub preview_samples: u32,
    pub preview_dt: f32,

    // === Brick grid ===
    pub columns: u32,
    pub max_rows: u32,
    pub base_health: i32,
    /// Per-health-point score reward multiplier
    pub base_score: u32,
    /// Row index at or below which bricks have reached the launch zone
    pub danger_row: i32,
    /// Brick cell geometry, for rendering snapshots
    pub brick_width: f32,
    pub brick_height: f32,
    pub brick_spacing: f32,
    /// World-space y of a row-0 brick center
    pub row0_y: f32,

    // === Round pacing ===
    /// Settle delay between "all balls returned" and the loss resolution
    pub balls_lost_settle_ticks: u32,
    /// Display delay before a cleared level respawns
    pub level_complete_delay_ticks: u32,

    // === Monetization hooks ===
    /// Signal an interstitial every N levels completed
    pub interstitial_frequency: u32,
    pub reward_policy: RewardPolicy,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            play_width: 720.0,
            play_height: 1280.0,
            launch_point: Vec2::new(360.0, 130.0),
            gravity: Vec2::ZERO,

            ball_radius: 8.0,
            min_speed: 400.0,
            max_speed: 600.0,
            launch_delay_ticks: 12,
            offscreen_grace_ticks: 240,
            brick_jitter_deg: 5.0,
            wall_jitter_deg: 2.0,

            max_drag_distance: 200.0,
            min_drag_distance: 10.0,
            drag_multiplier: 3.0,
            preview_samples: 30,
            preview_dt: 0.04,

            columns: 7,
            max_rows: 10,
            base_health: 1,
            base_score: 10,
            danger_row: 0,
            brick_width: 90.0,
            brick_height: 40.0,
            brick_spacing: 5.0,
            row0_y: 250.0,

            balls_lost_settle_ticks: 120,
            level_complete_delay_ticks: 240,

            interstitial_frequency: 3,
            reward_policy: RewardPolicy::GridAscent,
        }
    }
}

impl GameConfig {
    /// World-space center of the brick cell at (row, column).
    /// The grid is horizontally centered; rows count upward from the
    /// danger line toward the top of the play area.
    pub fn brick_position(&self, row: i32, column: u32) -> Vec2 {
        let pitch_x = self.brick_width + self.brick_spacing;
        let total_width = self.columns as f32 * pitch_x - self.brick_spacing;
        let left = (self.play_width - total_width) / 2.0 + self.brick_width / 2.0;
        let x = left + column as f32 * pitch_x;
        let y = self.row0_y + row as f32 * (self.brick_height + self.brick_spacing);
        Vec2::new(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_is_horizontally_centered() {
        let cfg = GameConfig::default();
        let first = cfg.brick_position(0, 0);
        let last = cfg.brick_position(0, cfg.columns - 1);
        let mid = (first.x + last.x) / 2.0;
        assert!((mid - cfg.play_width / 2.0).abs() < 1e-3);
    }

    #[test]
    fn rows_stack_upward() {
        let cfg = GameConfig::default();
        assert!(cfg.brick_position(3, 0).y > cfg.brick_position(2, 0).y);
    }

    #[test]
    fn config_round_trips_through_json() {
        let cfg = GameConfig::default();
        let json = serde_json::to_string(&cfg).unwrap();
        let back: GameConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.columns, cfg.columns);
        assert_eq!(back.reward_policy, RewardPolicy::GridAscent);
    }
}
