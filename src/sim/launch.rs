//! Drag gesture to launch velocity, trajectory preview, and the
//! sequential multi-ball launch schedule
//!
//! The preview is not physically integrated: it samples the closed-form
//! ballistic curve `p(t) = launch_point + v·t + ½·g·t²` and is recomputed
//! from scratch on every drag update.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::clamp_magnitude;
use crate::config::GameConfig;

/// An in-progress drag gesture
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DragState {
    pub start: Vec2,
    pub current: Vec2,
}

/// A scheduled batch of ball spawns sharing one launch velocity
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LaunchSequence {
    pub velocity: Vec2,
    /// Spawns still owed
    pub remaining: u32,
    /// Total balls in this launch
    pub total: u32,
    next_spawn_tick: u64,
}

/// Converts the pull gesture into launch velocity and paces the spawn batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaunchController {
    launch_point: Vec2,
    drag: Option<DragState>,
    sequence: Option<LaunchSequence>,
    max_drag_distance: f32,
    min_drag_distance: f32,
    drag_multiplier: f32,
    min_speed: f32,
    max_speed: f32,
    launch_delay_ticks: u32,
    gravity: Vec2,
    preview_samples: u32,
    preview_dt: f32,
    play_width: f32,
    play_height: f32,
}

impl LaunchController {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            launch_point: config.launch_point,
            drag: None,
            sequence: None,
            max_drag_distance: config.max_drag_distance,
            min_drag_distance: config.min_drag_distance,
            drag_multiplier: config.drag_multiplier,
            min_speed: config.min_speed,
            max_speed: config.max_speed,
            launch_delay_ticks: config.launch_delay_ticks,
            gravity: config.gravity,
            preview_samples: config.preview_samples,
            preview_dt: config.preview_dt,
            play_width: config.play_width,
            play_height: config.play_height,
        }
    }

    pub fn launch_point(&self) -> Vec2 {
        self.launch_point
    }

    /// Start a drag. Rejected while a launch sequence is pending or balls
    /// from the previous pull are still in flight (`balls_active`).
    pub fn begin_drag(&mut self, point: Vec2, balls_active: bool) -> bool {
        if balls_active || self.sequence.is_some() || self.drag.is_some() {
            return false;
        }
        self.drag = Some(DragState { start: point, current: point });
        true
    }

    /// Update the drag point and return the trajectory preview samples
    /// (empty when not dragging)
    pub fn update_drag(&mut self, point: Vec2) -> Vec<Vec2> {
        let Some(drag) = self.drag.as_mut() else {
            return Vec::new();
        };
        drag.current = point;
        self.trajectory_preview()
    }

    /// Prospective launch velocity for the current drag state.
    /// `None` while the pull is still within the tap threshold.
    pub fn launch_velocity(&self) -> Option<Vec2> {
        let drag = self.drag?;
        let pull = drag.start - drag.current;
        if pull.length() < self.min_drag_distance {
            return None;
        }
        let pull = clamp_magnitude(pull, self.max_drag_distance);
        let vel = pull * self.drag_multiplier;
        // A degenerate pull must not normalize to NaN; default to straight up
        let vel = if vel.length_squared() < 1e-6 {
            Vec2::new(0.0, self.min_speed)
        } else {
            vel
        };
        Some(super::ball::clamp_speed(vel, self.min_speed, self.max_speed))
    }

    /// Preview of the current aim: fixed-count samples along the ballistic
    /// curve, truncated where it leaves the play area
    pub fn trajectory_preview(&self) -> Vec<Vec2> {
        let Some(vel) = self.launch_velocity() else {
            return Vec::new();
        };
        let mut points = Vec::with_capacity(self.preview_samples as usize);
        for i in 0..self.preview_samples {
            let t = i as f32 * self.preview_dt;
            let p = self.launch_point + vel * t + 0.5 * self.gravity * t * t;
            points.push(p);
            if p.x < 0.0 || p.x > self.play_width || p.y < 0.0 || p.y > self.play_height {
                break;
            }
        }
        points
    }

    /// Finish the drag. A valid pull schedules `count` spawns starting at
    /// `now_tick` and returns the launch velocity; a tap returns `None`.
    pub fn end_drag(&mut self, point: Vec2, count: u32, now_tick: u64) -> Option<Vec2> {
        if let Some(drag) = self.drag.as_mut() {
            drag.current = point;
        }
        let vel = self.launch_velocity();
        self.drag = None;
        let vel = vel?;

        self.sequence = Some(LaunchSequence {
            velocity: vel,
            remaining: count,
            total: count,
            next_spawn_tick: now_tick,
        });
        Some(vel)
    }

    /// Advance the spawn schedule. Returns a spawn velocity when one is due
    /// this tick; at most one spawn per tick.
    pub fn poll_spawn(&mut self, now_tick: u64) -> Option<Vec2> {
        let seq = self.sequence.as_mut()?;
        if seq.remaining == 0 || now_tick < seq.next_spawn_tick {
            return None;
        }
        seq.remaining -= 1;
        seq.next_spawn_tick = now_tick + self.launch_delay_ticks as u64;
        let vel = seq.velocity;
        if seq.remaining == 0 {
            self.sequence = None;
        }
        Some(vel)
    }

    /// True while scheduled spawns are still owed
    pub fn is_launching(&self) -> bool {
        self.sequence.is_some()
    }

    /// `(spawned, total)` for the in-flight batch, for launch-progress
    /// display; `None` outside a launch
    pub fn launch_progress(&self) -> Option<(u32, u32)> {
        self.sequence.map(|seq| (seq.total - seq.remaining, seq.total))
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Cancel the drag and any pending spawns wholesale (round reset)
    pub fn cancel(&mut self) {
        self.drag = None;
        self.sequence = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> LaunchController {
        LaunchController::new(&GameConfig::default())
    }

    #[test]
    fn begin_drag_rejected_while_balls_active() {
        let mut c = controller();
        assert!(!c.begin_drag(Vec2::new(360.0, 130.0), true));
        assert!(c.begin_drag(Vec2::new(360.0, 130.0), false));
        // Already dragging
        assert!(!c.begin_drag(Vec2::new(300.0, 100.0), false));
    }

    #[test]
    fn tap_is_ignored() {
        let mut c = controller();
        let p = Vec2::new(360.0, 130.0);
        c.begin_drag(p, false);
        // 5 px pull, under the 10 px activation threshold
        assert!(c.end_drag(p + Vec2::new(3.0, 4.0), 3, 0).is_none());
        assert!(!c.is_launching());
    }

    #[test]
    fn pull_down_launches_up() {
        let mut c = controller();
        let p = Vec2::new(360.0, 130.0);
        c.begin_drag(p, false);
        let vel = c.end_drag(p - Vec2::new(0.0, 150.0), 1, 0).unwrap();
        assert!(vel.y > 0.0);
        assert_eq!(vel.x, 0.0);
        // 150 px * 3.0 = 450, inside the speed band
        assert!((vel.length() - 450.0).abs() < 1e-2);
    }

    #[test]
    fn drag_magnitude_is_capped() {
        let mut c = controller();
        let p = Vec2::new(360.0, 130.0);
        c.begin_drag(p, false);
        let vel = c.end_drag(p - Vec2::new(0.0, 5000.0), 1, 0).unwrap();
        // Capped pull (200) * 3.0 = 600 = max speed
        assert!((vel.length() - 600.0).abs() < 1e-2);
    }

    #[test]
    fn weak_pull_clamped_to_min_speed() {
        let mut c = controller();
        let p = Vec2::new(360.0, 130.0);
        c.begin_drag(p, false);
        // 20 px pull * 3.0 = 60, below min speed 400
        let vel = c.end_drag(p - Vec2::new(0.0, 20.0), 1, 0).unwrap();
        assert!((vel.length() - 400.0).abs() < 1e-2);
        assert!(vel.x.is_finite() && vel.y.is_finite());
    }

    #[test]
    fn preview_is_pure_and_restartable() {
        let mut c = controller();
        let p = Vec2::new(360.0, 130.0);
        c.begin_drag(p, false);
        let a = c.update_drag(p - Vec2::new(50.0, 100.0));
        let b = c.update_drag(p - Vec2::new(50.0, 100.0));
        assert_eq!(a, b);
        assert!(!a.is_empty());
        assert_eq!(a[0], p);
    }

    #[test]
    fn preview_truncates_at_play_area_edge() {
        let cfg = GameConfig::default();
        let mut c = LaunchController::new(&cfg);
        let p = cfg.launch_point;
        c.begin_drag(p, false);
        // Hard pull to the right: launch left at max speed, exits through x = 0
        let preview = c.update_drag(p + Vec2::new(200.0, 0.0));
        assert!(preview.len() < cfg.preview_samples as usize);
        // All but the last sample stay inside the play area
        for point in &preview[..preview.len() - 1] {
            assert!(point.x >= 0.0);
        }
        assert!(preview.last().unwrap().x < 0.0);
    }

    #[test]
    fn preview_empty_below_tap_threshold() {
        let mut c = controller();
        let p = Vec2::new(360.0, 130.0);
        c.begin_drag(p, false);
        assert!(c.update_drag(p - Vec2::new(2.0, 2.0)).is_empty());
    }

    #[test]
    fn sequence_paces_spawns_by_launch_delay() {
        let cfg = GameConfig::default();
        let mut c = LaunchController::new(&cfg);
        let p = cfg.launch_point;
        c.begin_drag(p, false);
        let vel = c.end_drag(p - Vec2::new(0.0, 150.0), 3, 100).unwrap();

        assert_eq!(c.poll_spawn(100), Some(vel));
        // Not due yet
        assert_eq!(c.poll_spawn(101), None);
        assert_eq!(c.poll_spawn(100 + cfg.launch_delay_ticks as u64), Some(vel));
        assert_eq!(c.poll_spawn(100 + 2 * cfg.launch_delay_ticks as u64), Some(vel));
        // Batch exhausted
        assert!(!c.is_launching());
        assert_eq!(c.poll_spawn(1000), None);
    }

    #[test]
    fn launch_progress_tracks_the_batch() {
        let cfg = GameConfig::default();
        let mut c = LaunchController::new(&cfg);
        let p = cfg.launch_point;
        assert_eq!(c.launch_progress(), None);

        c.begin_drag(p, false);
        c.end_drag(p - Vec2::new(0.0, 150.0), 3, 0);
        assert_eq!(c.launch_progress(), Some((0, 3)));

        c.poll_spawn(0);
        assert_eq!(c.launch_progress(), Some((1, 3)));
        c.poll_spawn(cfg.launch_delay_ticks as u64);
        assert_eq!(c.launch_progress(), Some((2, 3)));
        // Last spawn clears the sequence
        c.poll_spawn(2 * cfg.launch_delay_ticks as u64);
        assert_eq!(c.launch_progress(), None);
    }

    #[test]
    fn cancel_drops_pending_spawns() {
        let mut c = controller();
        let p = Vec2::new(360.0, 130.0);
        c.begin_drag(p, false);
        c.end_drag(p - Vec2::new(0.0, 150.0), 5, 0);
        c.poll_spawn(0);
        c.cancel();
        assert!(!c.is_launching());
        assert_eq!(c.poll_spawn(100), None);
    }
}
