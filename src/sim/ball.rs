//! Ball entities, speed-bound policy, and bounce jitter
//!
//! The external physics substrate integrates positions and resolves bounce
//! geometry; this module owns the policy on top of it: speed clamping after
//! every collision and tick, a small random bounce perturbation, and the
//! ball lifecycle (spawn, ground return, off-screen grace).

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::consts::{OFFSCREEN_MARGIN, STALL_SPEED_EPSILON};
use crate::rotate_deg;

use super::brick::BrickId;

/// Opaque ball handle
pub type BallId = u32;

/// What a ball collided with, as reported by the physics substrate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Brick(BrickId),
    Wall,
    Ground,
}

/// An in-flight ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub id: BallId,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Informational bounce counter
    pub bounce_count: u32,
    /// Tick at which the ball left the visible play area, if it has
    offscreen_since: Option<u64>,
}

/// Clamp a velocity into the speed band. Overspeed rescales to max;
/// moving-but-too-slow rescales to min; an effectively stationary vector is
/// returned unchanged (normalizing it would divide by zero).
pub fn clamp_speed(vel: Vec2, min: f32, max: f32) -> Vec2 {
    let speed = vel.length();
    if !speed.is_finite() {
        return Vec2::ZERO;
    }
    if speed > max {
        vel * (max / speed)
    } else if speed < min && speed > STALL_SPEED_EPSILON {
        vel * (min / speed)
    } else {
        vel
    }
}

/// Owns every in-flight ball. One launch cycle = one batch of spawns
/// followed by a single "all balls returned" signal when the last one exits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BallSet {
    balls: Vec<Ball>,
    next_id: BallId,
    /// True from the first spawn of a cycle until the all-returned signal
    cycle_active: bool,
    min_speed: f32,
    max_speed: f32,
    brick_jitter_deg: f32,
    wall_jitter_deg: f32,
    offscreen_grace_ticks: u32,
    play_width: f32,
    play_height: f32,
}

impl BallSet {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            balls: Vec::new(),
            next_id: 1,
            cycle_active: false,
            min_speed: config.min_speed,
            max_speed: config.max_speed,
            brick_jitter_deg: config.brick_jitter_deg,
            wall_jitter_deg: config.wall_jitter_deg,
            offscreen_grace_ticks: config.offscreen_grace_ticks,
            play_width: config.play_width,
            play_height: config.play_height,
        }
    }

    /// Spawn a ball. The velocity is clamped into the speed band before the
    /// first simulation step.
    pub fn spawn(&mut self, pos: Vec2, vel: Vec2) -> BallId {
        let id = self.next_id;
        self.next_id += 1;
        self.balls.push(Ball {
            id,
            pos,
            vel: clamp_speed(vel, self.min_speed, self.max_speed),
            bounce_count: 0,
            offscreen_since: None,
        });
        self.cycle_active = true;
        id
    }

    /// Post-collision policy: bounce accounting, bounded random angle jitter
    /// (breaks degenerate bounce loops between parallel surfaces), then
    /// speed-bound enforcement. Returns false for stale ids.
    ///
    /// Ground contacts get no jitter; the caller despawns instead.
    pub fn on_collision(&mut self, id: BallId, surface: Surface, rng: &mut Pcg32) -> bool {
        let Some(ball) = self.balls.iter_mut().find(|b| b.id == id) else {
            log::debug!("collision event for despawned ball {id}");
            return false;
        };
        ball.bounce_count += 1;

        let half_angle = match surface {
            Surface::Brick(_) => self.brick_jitter_deg,
            Surface::Wall => self.wall_jitter_deg,
            Surface::Ground => 0.0,
        };
        if half_angle > 0.0 {
            let angle = rng.random_range(-half_angle..=half_angle);
            ball.vel = rotate_deg(ball.vel, angle);
        }
        ball.vel = clamp_speed(ball.vel, self.min_speed, self.max_speed);
        true
    }

    /// Re-clamp one ball's speed (stale ids ignored)
    pub fn enforce_speed_bounds(&mut self, id: BallId) {
        if let Some(ball) = self.balls.iter_mut().find(|b| b.id == id) {
            ball.vel = clamp_speed(ball.vel, self.min_speed, self.max_speed);
        }
    }

    /// Per-tick sweep: clamp every ball's speed
    pub fn enforce_all_speed_bounds(&mut self) {
        for ball in &mut self.balls {
            ball.vel = clamp_speed(ball.vel, self.min_speed, self.max_speed);
        }
    }

    /// Remove a ball (ground contact). Returns false for stale ids.
    pub fn despawn(&mut self, id: BallId) -> bool {
        let before = self.balls.len();
        self.balls.retain(|b| b.id != id);
        before != self.balls.len()
    }

    /// Per-tick off-screen sweep. A ball outside the margin starts a grace
    /// period (transient camera/viewport glitches must not eat balls); only
    /// after the grace elapses is it confirmed gone. Returns removed ids.
    pub fn sweep_offscreen(&mut self, now_tick: u64) -> Vec<BallId> {
        let grace = self.offscreen_grace_ticks as u64;
        let mut removed = Vec::new();
        let width = self.play_width;
        let height = self.play_height;
        self.balls.retain_mut(|ball| {
            let inside = ball.pos.x >= -OFFSCREEN_MARGIN
                && ball.pos.x <= width + OFFSCREEN_MARGIN
                && ball.pos.y >= -OFFSCREEN_MARGIN
                && ball.pos.y <= height + OFFSCREEN_MARGIN;
            if inside {
                ball.offscreen_since = None;
                return true;
            }
            match ball.offscreen_since {
                None => {
                    ball.offscreen_since = Some(now_tick);
                    true
                }
                Some(since) if now_tick.saturating_sub(since) < grace => true,
                Some(_) => {
                    log::debug!("ball {} confirmed off-screen, despawning", ball.id);
                    removed.push(ball.id);
                    false
                }
            }
        });
        removed
    }

    /// True exactly once per launch cycle, when the live count has returned
    /// to zero after at least one spawn.
    pub fn check_all_returned(&mut self) -> bool {
        if self.cycle_active && self.balls.is_empty() {
            self.cycle_active = false;
            true
        } else {
            false
        }
    }

    /// Remove every ball and reset cycle tracking (round reset)
    pub fn clear(&mut self) {
        self.balls.clear();
        self.cycle_active = false;
    }

    pub fn live_count(&self) -> usize {
        self.balls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balls.is_empty()
    }

    pub fn get(&self, id: BallId) -> Option<&Ball> {
        self.balls.iter().find(|b| b.id == id)
    }

    /// Mutable access for the physics substrate's per-tick position and
    /// velocity write-back
    pub fn get_mut(&mut self, id: BallId) -> Option<&mut Ball> {
        self.balls.iter_mut().find(|b| b.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Ball> {
        self.balls.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;

    const MIN: f32 = 400.0;
    const MAX: f32 = 600.0;

    fn ball_set() -> BallSet {
        BallSet::new(&GameConfig::default())
    }

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(7)
    }

    #[test]
    fn spawn_clamps_initial_velocity() {
        let mut set = ball_set();
        let slow = set.spawn(Vec2::new(360.0, 130.0), Vec2::new(10.0, 10.0));
        let fast = set.spawn(Vec2::new(360.0, 130.0), Vec2::new(0.0, 5000.0));
        assert!((set.get(slow).unwrap().vel.length() - MIN).abs() < 1e-2);
        assert!((set.get(fast).unwrap().vel.length() - MAX).abs() < 1e-2);
    }

    #[test]
    fn stationary_ball_left_alone() {
        let v = clamp_speed(Vec2::ZERO, MIN, MAX);
        assert_eq!(v, Vec2::ZERO);
        let tiny = clamp_speed(Vec2::new(0.01, 0.0), MIN, MAX);
        assert_eq!(tiny, Vec2::new(0.01, 0.0));
    }

    #[test]
    fn collision_jitter_stays_in_band_and_counts_bounces() {
        let mut set = ball_set();
        let mut rng = rng();
        let id = set.spawn(Vec2::new(360.0, 130.0), Vec2::new(0.0, 500.0));

        for _ in 0..100 {
            assert!(set.on_collision(id, Surface::Brick(1), &mut rng));
            let ball = set.get(id).unwrap();
            let speed = ball.vel.length();
            assert!((MIN..=MAX + 1e-2).contains(&speed));
        }
        assert_eq!(set.get(id).unwrap().bounce_count, 100);
    }

    #[test]
    fn brick_jitter_bounded_by_five_degrees() {
        let mut set = ball_set();
        let mut rng = rng();
        for _ in 0..200 {
            let id = set.spawn(Vec2::ZERO, Vec2::new(0.0, 500.0));
            set.on_collision(id, Surface::Brick(1), &mut rng);
            let vel = set.get(id).unwrap().vel;
            let angle = vel.x.atan2(vel.y).to_degrees().abs();
            assert!(angle <= 5.0 + 1e-3);
            set.despawn(id);
            set.check_all_returned();
        }
    }

    #[test]
    fn ground_collision_applies_no_jitter() {
        let mut set = ball_set();
        let mut rng = rng();
        let id = set.spawn(Vec2::ZERO, Vec2::new(300.0, -400.0));
        let before = set.get(id).unwrap().vel;
        set.on_collision(id, Surface::Ground, &mut rng);
        assert_eq!(set.get(id).unwrap().vel, before);
    }

    #[test]
    fn stale_collision_event_ignored() {
        let mut set = ball_set();
        let mut rng = rng();
        let id = set.spawn(Vec2::ZERO, Vec2::new(0.0, 500.0));
        set.despawn(id);
        assert!(!set.on_collision(id, Surface::Wall, &mut rng));
    }

    #[test]
    fn all_returned_fires_once_per_cycle() {
        let mut set = ball_set();
        let a = set.spawn(Vec2::ZERO, Vec2::new(0.0, 500.0));
        let b = set.spawn(Vec2::ZERO, Vec2::new(0.0, 500.0));

        assert!(!set.check_all_returned());
        set.despawn(a);
        assert!(!set.check_all_returned());
        set.despawn(b);
        assert!(set.check_all_returned());
        // Only once
        assert!(!set.check_all_returned());
    }

    #[test]
    fn no_signal_without_a_launch() {
        let mut set = ball_set();
        assert!(!set.check_all_returned());
    }

    #[test]
    fn offscreen_grace_period() {
        let cfg = GameConfig::default();
        let mut set = BallSet::new(&cfg);
        let id = set.spawn(Vec2::new(360.0, 130.0), Vec2::new(0.0, 500.0));
        set.get_mut(id).unwrap().pos = Vec2::new(-500.0, 130.0);

        // Marked at tick 10, still alive through the grace window
        assert!(set.sweep_offscreen(10).is_empty());
        assert!(set.sweep_offscreen(10 + cfg.offscreen_grace_ticks as u64 - 1).is_empty());
        // Confirmed gone once the grace elapses
        let removed = set.sweep_offscreen(10 + cfg.offscreen_grace_ticks as u64);
        assert_eq!(removed, vec![id]);
        assert!(set.check_all_returned());
    }

    #[test]
    fn returning_on_screen_clears_grace_marker() {
        let cfg = GameConfig::default();
        let mut set = BallSet::new(&cfg);
        let id = set.spawn(Vec2::new(360.0, 130.0), Vec2::new(0.0, 500.0));

        set.get_mut(id).unwrap().pos = Vec2::new(-500.0, 130.0);
        assert!(set.sweep_offscreen(10).is_empty());

        // Ball comes back inside; the old marker must not count
        set.get_mut(id).unwrap().pos = Vec2::new(360.0, 600.0);
        assert!(set.sweep_offscreen(100).is_empty());
        set.get_mut(id).unwrap().pos = Vec2::new(-500.0, 130.0);
        assert!(set.sweep_offscreen(1000).is_empty());
        assert_eq!(set.live_count(), 1);
    }

    proptest! {
        #[test]
        fn clamp_speed_never_produces_nan(
            x in -10_000.0f32..10_000.0,
            y in -10_000.0f32..10_000.0,
        ) {
            let v = clamp_speed(Vec2::new(x, y), MIN, MAX);
            prop_assert!(v.x.is_finite() && v.y.is_finite());
            let speed = v.length();
            // Either in band or effectively stationary
            prop_assert!(
                speed <= STALL_SPEED_EPSILON
                    || (speed >= MIN - 1e-2 && speed <= MAX + 1e-2)
            );
        }

        #[test]
        fn jitter_preserves_speed(
            x in -600.0f32..600.0,
            y in -600.0f32..600.0,
            deg in -5.0f32..5.0,
        ) {
            prop_assume!(Vec2::new(x, y).length() > 1.0);
            let v = Vec2::new(x, y);
            let r = crate::rotate_deg(v, deg);
            prop_assert!((r.length() - v.length()).abs() < 1e-2);
        }
    }
}
