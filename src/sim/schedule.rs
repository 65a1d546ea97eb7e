//! Tick-keyed scheduled transitions
//!
//! Delayed round transitions (loss settle, level-complete display) are
//! queued against the logical tick counter and drained by the frame loop,
//! which keeps them deterministic and testable without real time passing.

use serde::{Deserialize, Serialize};

/// A minimal future-event queue. Entries due at the same tick resolve in
/// insertion order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scheduler<T> {
    entries: Vec<(u64, T)>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self { entries: Vec::new() }
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, due_tick: u64, item: T) {
        self.entries.push((due_tick, item));
    }

    /// Remove and return every entry due at or before `now_tick`,
    /// earliest due tick first
    pub fn drain_due(&mut self, now_tick: u64) -> Vec<T> {
        if !self.entries.iter().any(|(due, _)| *due <= now_tick) {
            return Vec::new();
        }
        // Stable sort keeps insertion order within a tick
        self.entries.sort_by_key(|(due, _)| *due);
        let split = self.entries.partition_point(|(due, _)| *due <= now_tick);
        let rest = self.entries.split_off(split);
        std::mem::replace(&mut self.entries, rest)
            .into_iter()
            .map(|(_, item)| item)
            .collect()
    }

    /// Drop everything pending (round reset)
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
