//! High score leaderboard
//!
//! Top 10 runs, sorted descending; ties rank the earlier entry first.
//! Persisted through the [`StorageBackend`] boundary.

use serde::{Deserialize, Serialize};

use crate::platform::StorageBackend;

/// Maximum number of leaderboard entries to keep
pub const MAX_ENTRIES: usize = 10;

const STORAGE_KEY: &str = "brick_sling_leaderboard";

/// A single leaderboard entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub score: u64,
    /// Level reached when the run ended
    pub level: u32,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

/// Score leaderboard
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Leaderboard {
    pub entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Check if a score would make the board
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_ENTRIES {
            return true;
        }
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Rank a score would achieve (1-indexed, None if it doesn't qualify)
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Add a score if it qualifies. Returns the rank achieved (1-indexed).
    /// A tie slots below the existing entries of the same score.
    pub fn add_score(
        &mut self,
        name: &str,
        score: u64,
        level: u32,
        timestamp: f64,
    ) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }

        let entry = LeaderboardEntry { name: name.to_string(), score, level, timestamp };

        let pos = self.entries.iter().position(|e| score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };

        self.entries.truncate(MAX_ENTRIES);
        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Load the leaderboard; a missing or unreadable record starts fresh
    pub fn load(storage: &dyn StorageBackend) -> Self {
        if let Some(json) = storage.get(STORAGE_KEY) {
            match serde_json::from_str::<Leaderboard>(&json) {
                Ok(board) => {
                    log::info!("loaded {} leaderboard entries", board.entries.len());
                    return board;
                }
                Err(err) => log::warn!("discarding unreadable leaderboard: {err}"),
            }
        }
        Self::new()
    }

    pub fn save(&self, storage: &mut dyn StorageBackend) {
        match serde_json::to_string(self) {
            Ok(json) => {
                if !storage.set(STORAGE_KEY, &json) {
                    log::warn!("leaderboard save was dropped by storage");
                }
            }
            Err(err) => log::warn!("leaderboard serialize failed: {err}"),
        }
    }
}
