//! Deterministic gameplay simulation
//!
//! All round logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (scheduled transitions, no real-time waits)
//! - Seeded RNG only (bounce jitter)
//! - Stable iteration order (by entity id)
//! - No rendering or platform dependencies beyond the injected collaborators

pub mod ball;
pub mod brick;
pub mod event;
pub mod launch;
pub mod round;
pub mod schedule;
pub mod tick;

pub use ball::{Ball, BallId, BallSet, Surface, clamp_speed};
pub use brick::{Brick, BrickGrid, BrickId, DamageOutcome};
pub use event::{AudioCue, GameEvent};
pub use launch::{LaunchController, LaunchSequence};
pub use round::{
    BallView, BrickView, RoundPhase, RoundSnapshot, RoundState, SessionState,
};
pub use schedule::Scheduler;
pub use tick::{CollisionEvent, TickInput, tick};
