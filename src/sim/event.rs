//! Semantic output of the simulation
//!
//! Each tick produces a batch of [`GameEvent`]s for the embedder (UI,
//! persistence triggers) and routes [`AudioCue`]s to the audio collaborator.

use super::ball::BallId;
use super::brick::BrickId;

/// Fire-and-forget sound cues, consumed by the audio collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCue {
    BallLaunched,
    BallBounced,
    BrickHit,
    BrickDestroyed,
    LevelComplete,
    GameOver,
    /// Fired by the embedder's UI layer on menu interaction; the sim
    /// itself never emits this cue
    ButtonClicked,
}

/// Discrete gameplay events emitted by [`super::tick`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    /// A brick took damage but survived
    BrickDamaged { brick: BrickId, health: i32 },
    /// A brick reached zero health and was removed
    BrickDestroyed { brick: BrickId, row: i32, reward: u64 },
    /// A ball entered play
    BallSpawned { ball: BallId },
    /// A ball left play (ground contact or confirmed off-screen)
    BallReturned { ball: BallId },
    /// The last in-flight ball of a launch cycle returned
    AllBallsReturned,
    /// The grid moved one row toward the launch zone
    GridDescended { lowest_row: i32 },
    /// Every brick destroyed; the level transition is now scheduled
    LevelComplete { level: u32 },
    /// A fresh grid spawned for `level`
    LevelStarted { level: u32, bricks: usize },
    /// The run ended
    GameOver { score: u64, level: u32 },
    /// The embedder should display an interstitial ad
    ShowInterstitial,
    /// Session counters changed in a way worth checkpointing
    CheckpointRequested,
}
