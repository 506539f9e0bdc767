// Picked-state tracking, keyed by player rank.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Ranks the user has marked as drafted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickedSet {
    ranks: BTreeSet<i64>,
}

impl PickedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip membership of `rank`. Returns `true` if the rank is now picked.
    pub fn toggle(&mut self, rank: i64) -> bool {
        if self.ranks.remove(&rank) {
            false
        } else {
            self.ranks.insert(rank);
            true
        }
    }

    pub fn contains(&self, rank: i64) -> bool {
        self.ranks.contains(&rank)
    }

    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }

    pub fn clear(&mut self) {
        self.ranks.clear();
    }

    /// Picked ranks in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = i64> + '_ {
        self.ranks.iter().copied()
    }
}
