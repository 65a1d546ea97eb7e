//! Round orchestration: level progression, ball-loss accounting, and the
//! win/loss decision logic
//!
//! [`RoundState`] owns the grid, the ball set, and the launch controller;
//! cross-effects between them are routed as discrete events through the
//! tick driver, never via back-references. Collaborators (audio, ads,
//! storage) are injected per call — no ambient global state.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::config::{GameConfig, RewardPolicy};
use crate::platform::{AdGateway, RewardedOutcome, StorageBackend};

use super::ball::{BallId, BallSet};
use super::brick::BrickGrid;
use super::event::GameEvent;
use super::launch::LaunchController;
use super::schedule::Scheduler;

/// Phase of the round state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    /// Waiting for the player to start a pull
    Idle,
    /// Drag in progress
    Aiming,
    /// Launch sequence spawning balls
    Launching,
    /// Balls in flight, waiting for clearance or return
    AwaitingResolution,
    /// Grid cleared; level transition scheduled
    LevelComplete,
    /// All balls returned without clearing; loss resolution scheduled
    BallsLostPending,
    /// Run ended. Exited only by restart or a rewarded continue.
    GameOver,
}

/// Persisted cross-round counters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub level: u32,
    pub score: u64,
    /// Balls in the player's pool; grows by one per level cleared
    pub balls_collected: u32,
    /// Full pulls left before the grid descends or the run ends
    pub balls_remaining: u32,
    /// Monotone across runs
    pub high_score: u64,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            level: 1,
            score: 0,
            balls_collected: 1,
            balls_remaining: 1,
            high_score: 0,
        }
    }

    /// Reset the run counters, preserving the high score
    pub fn reset_run(&mut self) {
        self.level = 1;
        self.score = 0;
        self.balls_collected = 1;
        self.balls_remaining = 1;
    }

    /// Raise the high score if the current score beats it
    pub fn commit_high_score(&mut self) -> bool {
        if self.score > self.high_score {
            self.high_score = self.score;
            true
        } else {
            false
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

/// Delayed transitions resolved by the tick driver via the scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub(super) enum PendingTransition {
    ResolveBallsLost,
    AdvanceLevel,
}

/// Complete round state. Constructed once per game at composition time.
#[derive(Debug, Clone)]
pub struct RoundState {
    pub config: GameConfig,
    pub phase: RoundPhase,
    pub session: SessionState,
    pub grid: BrickGrid,
    pub balls: BallSet,
    pub launcher: LaunchController,
    pub(super) scheduler: Scheduler<PendingTransition>,
    pub(super) rng: Pcg32,
    pub tick_count: u64,
    /// Last trajectory preview computed while aiming, for display
    pub preview: Vec<Vec2>,
    seed: u64,
}

impl RoundState {
    /// Fresh game at level 1
    pub fn new(config: GameConfig, seed: u64) -> Self {
        Self::with_session(config, seed, SessionState::new())
    }

    /// Resume from a persisted session (crash/continue recovery). The grid
    /// respawns for the saved level; balls in flight are not restored.
    pub fn resume(config: GameConfig, seed: u64, mut session: SessionState) -> Self {
        session.balls_remaining = session.balls_collected;
        Self::with_session(config, seed, session)
    }

    fn with_session(config: GameConfig, seed: u64, session: SessionState) -> Self {
        let mut grid = BrickGrid::new(&config);
        grid.spawn_level(session.level);
        let balls = BallSet::new(&config);
        let launcher = LaunchController::new(&config);
        Self {
            phase: RoundPhase::Idle,
            session,
            grid,
            balls,
            launcher,
            scheduler: Scheduler::new(),
            rng: Pcg32::seed_from_u64(seed),
            tick_count: 0,
            preview: Vec::new(),
            config,
            seed,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Respawn the grid for the current session level and return to Idle
    pub(super) fn start_level(&mut self, events: &mut Vec<GameEvent>) {
        self.balls.clear();
        self.launcher.cancel();
        self.scheduler.clear();
        self.preview.clear();
        let bricks = self.grid.spawn_level(self.session.level);
        self.session.balls_remaining = self.session.balls_collected;
        self.phase = RoundPhase::Idle;
        events.push(GameEvent::LevelStarted { level: self.session.level, bricks });
    }

    /// Enter LevelComplete: clearance was detected on a brick destruction.
    /// The actual level advance runs after the display delay.
    pub(super) fn enter_level_complete(&mut self, events: &mut Vec<GameEvent>) {
        self.phase = RoundPhase::LevelComplete;
        events.push(GameEvent::LevelComplete { level: self.session.level });
        self.scheduler.schedule(
            self.tick_count + self.config.level_complete_delay_ticks as u64,
            PendingTransition::AdvanceLevel,
        );
    }

    /// Scheduled LevelComplete resolution: bump level, grant the extra
    /// ball, optionally signal an interstitial, respawn the grid.
    pub(super) fn advance_level(&mut self, events: &mut Vec<GameEvent>) {
        if self.phase != RoundPhase::LevelComplete {
            log::debug!("stale AdvanceLevel in phase {:?}", self.phase);
            return;
        }
        self.session.level += 1;
        self.session.balls_collected += 1;
        if self.session.level % self.config.interstitial_frequency == 0 {
            events.push(GameEvent::ShowInterstitial);
        }
        events.push(GameEvent::CheckpointRequested);
        self.start_level(events);
    }

    /// Enter BallsLostPending: the launch cycle ended with bricks left.
    /// The loss resolves after the settle delay.
    pub(super) fn enter_balls_lost(&mut self, events: &mut Vec<GameEvent>) {
        self.phase = RoundPhase::BallsLostPending;
        events.push(GameEvent::AllBallsReturned);
        self.scheduler.schedule(
            self.tick_count + self.config.balls_lost_settle_ticks as u64,
            PendingTransition::ResolveBallsLost,
        );
    }

    /// Scheduled BallsLostPending resolution: spend a pull, then either
    /// hand back control, descend the grid, or end the run.
    pub(super) fn resolve_balls_lost(&mut self, events: &mut Vec<GameEvent>) {
        if self.phase != RoundPhase::BallsLostPending {
            log::debug!("stale ResolveBallsLost in phase {:?}", self.phase);
            return;
        }
        self.session.balls_remaining = self.session.balls_remaining.saturating_sub(1);
        events.push(GameEvent::CheckpointRequested);

        if self.session.balls_remaining > 0 {
            self.phase = RoundPhase::Idle;
            return;
        }

        if self.grid.at_danger_row() {
            self.enter_game_over(events);
        } else {
            self.grid.descend();
            let lowest = self.grid.lowest_row().unwrap_or(0);
            events.push(GameEvent::GridDescended { lowest_row: lowest });
            self.session.balls_remaining = self.session.balls_collected;
            self.phase = RoundPhase::Idle;
        }
    }

    pub(super) fn enter_game_over(&mut self, events: &mut Vec<GameEvent>) {
        self.phase = RoundPhase::GameOver;
        self.launcher.cancel();
        self.scheduler.clear();
        self.session.commit_high_score();
        events.push(GameEvent::GameOver {
            score: self.session.score,
            level: self.session.level,
        });
        events.push(GameEvent::CheckpointRequested);
    }

    /// Full restart: level 1, zero score, single ball, fresh grid
    pub fn restart(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();
        self.session.reset_run();
        self.start_level(&mut events);
        events.push(GameEvent::CheckpointRequested);
        events
    }

    /// Rewarded-ad continuation. Only meaningful in GameOver; score and
    /// level are preserved, what the player gets back depends on the
    /// configured reward policy.
    pub fn continue_with_reward(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.phase != RoundPhase::GameOver {
            log::debug!("continue_with_reward ignored in phase {:?}", self.phase);
            return events;
        }
        match self.config.reward_policy {
            RewardPolicy::GridAscent => {
                // Breathing room: the grant itself must never re-trigger
                // game over, so the danger state is not re-evaluated here
                self.grid.ascend();
            }
            RewardPolicy::BonusBalls { count } => {
                self.session.balls_collected += count;
            }
        }
        self.session.balls_remaining = self.session.balls_collected;
        self.balls.clear();
        self.launcher.cancel();
        self.scheduler.clear();
        self.phase = RoundPhase::Idle;
        events.push(GameEvent::CheckpointRequested);
        events
    }

    /// Run the rewarded-ad continue flow against the ad collaborator.
    /// No ad available or a dismissal leaves the state machine unchanged.
    pub fn offer_continue(&mut self, ads: &mut dyn AdGateway) -> Option<Vec<GameEvent>> {
        if self.phase != RoundPhase::GameOver {
            return None;
        }
        if !ads.is_rewarded_available() {
            log::info!("rewarded ad unavailable, continue suppressed");
            return None;
        }
        match ads.show_rewarded() {
            RewardedOutcome::Rewarded => Some(self.continue_with_reward()),
            RewardedOutcome::Dismissed => None,
        }
    }

    /// Persist the session counters (best effort; a failed write degrades
    /// to in-memory play)
    pub fn checkpoint(&self, storage: &mut dyn StorageBackend) {
        crate::persistence::save_session(storage, &self.session);
    }

    /// Read-only display snapshot for the renderer
    pub fn snapshot(&self) -> RoundSnapshot {
        RoundSnapshot {
            phase: self.phase,
            level: self.session.level,
            score: self.session.score,
            balls_remaining: self.session.balls_remaining,
            balls_collected: self.session.balls_collected,
            high_score: self.session.high_score,
            bricks: self
                .grid
                .iter()
                .map(|b| BrickView {
                    id: b.id,
                    pos: self.config.brick_position(b.row, b.column),
                    row: b.row,
                    column: b.column,
                    health: b.health,
                    max_health: b.max_health,
                    tier: b.tier,
                })
                .collect(),
            balls: self
                .balls
                .iter()
                .map(|b| BallView {
                    id: b.id,
                    pos: b.pos,
                    radius: self.config.ball_radius,
                    bounce_count: b.bounce_count,
                })
                .collect(),
            trajectory: self.preview.clone(),
            launch_progress: self.launcher.launch_progress(),
        }
    }
}

/// Renderer-facing brick state
#[derive(Debug, Clone, PartialEq)]
pub struct BrickView {
    pub id: super::brick::BrickId,
    pub pos: Vec2,
    pub row: i32,
    pub column: u32,
    pub health: i32,
    pub max_health: i32,
    pub tier: u32,
}

/// Renderer-facing ball state
#[derive(Debug, Clone, PartialEq)]
pub struct BallView {
    pub id: BallId,
    pub pos: Vec2,
    pub radius: f32,
    pub bounce_count: u32,
}

/// Read-only view of everything the UI needs to draw a frame
#[derive(Debug, Clone, PartialEq)]
pub struct RoundSnapshot {
    pub phase: RoundPhase,
    pub level: u32,
    pub score: u64,
    pub balls_remaining: u32,
    pub balls_collected: u32,
    pub high_score: u64,
    pub bricks: Vec<BrickView>,
    pub balls: Vec<BallView>,
    pub trajectory: Vec<Vec2>,
    /// `(spawned, total)` while a launch batch is in flight
    pub launch_progress: Option<(u32, u32)>,
}
