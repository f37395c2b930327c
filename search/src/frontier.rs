//! Cost-ordered frontier: an ordered multi-container keyed by total cost.
//!
//! Uses a `BTreeMap` (not `BinaryHeap`) so that ascending iteration is as
//! cheap as popping, and so that iteration order is deterministic for
//! domains that scan the frontier.

use std::collections::BTreeMap;

use crate::contract::Cost;

/// The frontier ordering key: `(total_cost, tie_rank, sequence)`.
///
/// Lower `total_cost` first, then lower `tie_rank`, then older `sequence`.
/// `sequence` is unique within a frontier, so two entries never compare
/// equal and equal-cost entries never overwrite each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FrontierKey {
    pub total_cost: Cost,
    pub tie_rank: u32,
    pub sequence: u64,
}

/// Ordered multi-container of values keyed by total cost.
///
/// Duplicate costs are permitted. Among equal `(cost, rank)` pairs,
/// retrieval order equals insertion order.
#[derive(Debug, Clone)]
pub struct CostFrontier<T> {
    entries: BTreeMap<FrontierKey, T>,
    next_sequence: u64,
    high_water: usize,
}

impl<T> CostFrontier<T> {
    /// Create a new empty frontier.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_sequence: 0,
            high_water: 0,
        }
    }

    /// Insert `value` keyed by `cost`, after any entries of equal cost.
    pub fn push(&mut self, cost: Cost, value: T) {
        self.push_ranked(cost, 0, value);
    }

    /// Insert `value` keyed by `(cost, rank)`.
    ///
    /// `rank` orders entries of equal cost before insertion order does.
    pub fn push_ranked(&mut self, cost: Cost, rank: u32, value: T) {
        let key = FrontierKey {
            total_cost: cost,
            tie_rank: rank,
            sequence: self.next_sequence,
        };
        self.next_sequence += 1;
        self.entries.insert(key, value);
        self.high_water = self.high_water.max(self.entries.len());
    }

    /// Remove and return the value with the smallest key.
    ///
    /// Returns `None` when the frontier is empty.
    pub fn pop_min(&mut self) -> Option<T> {
        self.entries.pop_first().map(|(_, value)| value)
    }

    /// Whether the frontier is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Largest number of entries held at once since creation or the last
    /// [`CostFrontier::clear`].
    #[must_use]
    pub fn high_water(&self) -> usize {
        self.high_water
    }

    /// Values in ascending key order.
    pub fn values(&self) -> impl Iterator<Item = &T> + '_ {
        self.entries.values()
    }

    /// Drop every entry and restart the insertion counter.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.next_sequence = 0;
        self.high_water = 0;
    }
}

impl<T> Default for CostFrontier<T> {
    fn default() -> Self {
        Self::new()
    }
}
