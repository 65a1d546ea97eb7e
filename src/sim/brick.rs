//! Brick entities and the grid that owns them
//!
//! Damage resolution, clearance detection, and the danger-row check are all
//! pure grid state, independent of physics timing, so they live here and are
//! unit-testable without a collision engine.

use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::consts::BRICK_PALETTE_SIZE;

/// Opaque brick handle. Ids are never reused within a level.
pub type BrickId = u32;

/// A destructible brick. `row` is mutable (grid descent/ascent shifts it);
/// `column` is fixed at spawn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Brick {
    pub id: BrickId,
    pub row: i32,
    pub column: u32,
    pub health: i32,
    pub max_health: i32,
    /// Cosmetic palette tier, `spawn row % palette size`
    pub tier: u32,
}

/// Result of a damage application that found a live brick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamageOutcome {
    /// Health remaining (<= 0 means the brick was removed)
    pub health: i32,
    pub destroyed: bool,
    /// Score reward, non-zero only on destruction
    pub reward: u64,
    /// Row at the moment of destruction
    pub row: i32,
    /// True when this destruction emptied the grid (level clear)
    pub grid_cleared: bool,
}

/// Owns every live brick. Other components hold [`BrickId`]s only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrickGrid {
    bricks: Vec<Brick>,
    next_id: BrickId,
    columns: u32,
    max_rows: u32,
    base_health: i32,
    base_score: u32,
    danger_row: i32,
}

impl BrickGrid {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            bricks: Vec::new(),
            next_id: 1,
            columns: config.columns,
            max_rows: config.max_rows,
            base_health: config.base_health,
            base_score: config.base_score,
            danger_row: config.danger_row,
        }
    }

    /// Clear the grid and spawn the layout for `level`: one row per level up
    /// to the cap, `columns` bricks per row. Row 0 sits nearest the launch
    /// point and is the weakest; health grows with level and row.
    /// Returns the number of bricks spawned.
    pub fn spawn_level(&mut self, level: u32) -> usize {
        self.bricks.clear();

        let rows = level.min(self.max_rows);
        for row in 0..rows {
            for column in 0..self.columns {
                let health = self.base_health + level as i32 + row as i32;
                let id = self.next_id;
                self.next_id += 1;
                self.bricks.push(Brick {
                    id,
                    row: row as i32,
                    column,
                    health,
                    max_health: health,
                    tier: row % BRICK_PALETTE_SIZE,
                });
            }
        }

        log::debug!("spawned {} bricks for level {level}", self.bricks.len());
        self.bricks.len()
    }

    /// Apply `amount` damage to a brick. Returns `None` for stale ids
    /// (physics event delivery can race with despawn within a tick).
    /// A brick is removed exactly once, when health first drops to zero;
    /// its reward is `(base_health + row) * base_score`.
    pub fn apply_damage(&mut self, id: BrickId, amount: i32) -> Option<DamageOutcome> {
        let idx = self.bricks.iter().position(|b| b.id == id)?;
        let brick = &mut self.bricks[idx];
        brick.health -= amount;

        if brick.health <= 0 {
            let row = brick.row;
            let reward =
                (self.base_health as i64 + row as i64).max(0) as u64 * self.base_score as u64;
            self.bricks.remove(idx);
            Some(DamageOutcome {
                health: 0,
                destroyed: true,
                reward,
                row,
                grid_cleared: self.bricks.is_empty(),
            })
        } else {
            Some(DamageOutcome {
                health: brick.health,
                destroyed: false,
                reward: 0,
                row: brick.row,
                grid_cleared: false,
            })
        }
    }

    /// Shift every brick one row toward the launch zone. Returns true if the
    /// lowest row is now at or past the danger row.
    pub fn descend(&mut self) -> bool {
        for brick in &mut self.bricks {
            brick.row -= 1;
        }
        self.lowest_row().is_some_and(|r| r <= self.danger_row)
    }

    /// Inverse of [`descend`](Self::descend), used for the rewarded-ad
    /// breathing-room grant. Deliberately does not re-evaluate the danger
    /// state: granting relief must never itself end the run.
    pub fn ascend(&mut self) {
        for brick in &mut self.bricks {
            brick.row += 1;
        }
    }

    /// Minimum row among live bricks, `None` when the grid is empty
    pub fn lowest_row(&self) -> Option<i32> {
        self.bricks.iter().map(|b| b.row).min()
    }

    /// True when the lowest live brick has reached the launch zone
    pub fn at_danger_row(&self) -> bool {
        self.lowest_row().is_some_and(|r| r <= self.danger_row)
    }

    pub fn is_empty(&self) -> bool {
        self.bricks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bricks.len()
    }

    pub fn get(&self, id: BrickId) -> Option<&Brick> {
        self.bricks.iter().find(|b| b.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Brick> {
        self.bricks.iter()
    }
}
