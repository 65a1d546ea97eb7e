//! Per-tick simulation driver
//!
//! The embedder calls [`tick`] once per fixed timestep with the sampled
//! input and the collision events the physics substrate produced since the
//! last call. Everything here is deterministic for a given seed, input
//! sequence, and collision sequence; the returned event batch is the only
//! channel back to the UI layer.

use glam::Vec2;

use crate::platform::AudioSink;

use super::ball::{BallId, Surface};
use super::event::{AudioCue, GameEvent};
use super::round::{RoundPhase, RoundState};

/// Pointer input sampled for one tick. At most one press, one drag update,
/// and one release are honored per tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    pub press: Option<Vec2>,
    pub drag: Option<Vec2>,
    pub release: Option<Vec2>,
}

/// A contact reported by the physics substrate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionEvent {
    pub ball: BallId,
    pub surface: Surface,
}

/// Advance the round by one tick.
///
/// Order within a tick: scheduled transitions first, then input, then the
/// launch schedule, then collision resolution, then the per-ball sweeps,
/// then the cycle-end check. Events that arrive for entities despawned
/// earlier in the same tick are dropped.
pub fn tick(
    round: &mut RoundState,
    input: &TickInput,
    collisions: &[CollisionEvent],
    audio: &mut dyn AudioSink,
) -> Vec<GameEvent> {
    round.tick_count += 1;
    let now = round.tick_count;
    let mut events = Vec::new();

    for transition in round.scheduler.drain_due(now) {
        use super::round::PendingTransition::*;
        match transition {
            ResolveBallsLost => round.resolve_balls_lost(&mut events),
            AdvanceLevel => round.advance_level(&mut events),
        }
    }

    apply_input(round, input);

    if round.phase == RoundPhase::Launching {
        if let Some(vel) = round.launcher.poll_spawn(now) {
            let id = round.balls.spawn(round.launcher.launch_point(), vel);
            events.push(GameEvent::BallSpawned { ball: id });
            audio.play(AudioCue::BallLaunched);
        }
        if !round.launcher.is_launching() {
            round.phase = RoundPhase::AwaitingResolution;
        }
    }

    for collision in collisions {
        resolve_collision(round, collision, &mut events, audio);
    }

    round.balls.enforce_all_speed_bounds();
    for id in round.balls.sweep_offscreen(now) {
        events.push(GameEvent::BallReturned { ball: id });
    }

    // A cycle only ends while awaiting resolution; during LevelComplete the
    // stragglers are cleared with the grid respawn instead
    if round.phase == RoundPhase::AwaitingResolution && round.balls.check_all_returned() {
        round.enter_balls_lost(&mut events);
    }

    for event in &events {
        match event {
            GameEvent::LevelComplete { .. } => audio.play(AudioCue::LevelComplete),
            GameEvent::GameOver { .. } => audio.play(AudioCue::GameOver),
            _ => {}
        }
    }

    events
}

fn apply_input(round: &mut RoundState, input: &TickInput) {
    if let Some(point) = input.press {
        if round.phase == RoundPhase::Idle
            && round.launcher.begin_drag(point, !round.balls.is_empty())
        {
            round.phase = RoundPhase::Aiming;
        }
    }

    if let Some(point) = input.drag {
        if round.phase == RoundPhase::Aiming {
            round.preview = round.launcher.update_drag(point);
        }
    }

    if let Some(point) = input.release {
        if round.phase == RoundPhase::Aiming {
            let count = round.session.balls_collected;
            match round.launcher.end_drag(point, count, round.tick_count) {
                Some(_) => round.phase = RoundPhase::Launching,
                // Tap under the activation threshold: no launch
                None => round.phase = RoundPhase::Idle,
            }
            round.preview.clear();
        }
    }
}

fn resolve_collision(
    round: &mut RoundState,
    collision: &CollisionEvent,
    events: &mut Vec<GameEvent>,
    audio: &mut dyn AudioSink,
) {
    match collision.surface {
        Surface::Brick(brick_id) => {
            if !round.balls.on_collision(collision.ball, collision.surface, &mut round.rng) {
                return;
            }
            let Some(outcome) = round.grid.apply_damage(brick_id, 1) else {
                log::debug!("hit on despawned brick {brick_id}");
                return;
            };
            if outcome.destroyed {
                round.session.score += outcome.reward;
                events.push(GameEvent::BrickDestroyed {
                    brick: brick_id,
                    row: outcome.row,
                    reward: outcome.reward,
                });
                audio.play(AudioCue::BrickDestroyed);
                if outcome.grid_cleared {
                    round.enter_level_complete(events);
                }
            } else {
                events.push(GameEvent::BrickDamaged { brick: brick_id, health: outcome.health });
                audio.play(AudioCue::BrickHit);
            }
        }
        Surface::Wall => {
            if round.balls.on_collision(collision.ball, collision.surface, &mut round.rng) {
                audio.play(AudioCue::BallBounced);
            }
        }
        Surface::Ground => {
            if round.balls.despawn(collision.ball) {
                events.push(GameEvent::BallReturned { ball: collision.ball });
            } else {
                log::debug!("ground contact for despawned ball {}", collision.ball);
            }
        }
    }
}
