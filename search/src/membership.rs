//! Hashed membership index and the read-only frontier view handed to
//! domains.
//!
//! The index answers "is this logical state in open/closed?" in O(1) using
//! the domain's [`SearchNode::state_key`]. Domains that prefer their own
//! equality can ignore it and scan [`FrontierView::iter`] instead.

use std::collections::HashMap;
use std::hash::Hash;

use crate::contract::SearchNode;
use crate::frontier::CostFrontier;
use crate::node::{NodeArena, NodeId};

/// Map from state key to the arena node holding that state.
///
/// First insertion wins: a later node with an equal key does not replace
/// the recorded one.
#[derive(Debug, Clone)]
pub struct MembershipIndex<K> {
    members: HashMap<K, NodeId>,
}

impl<K: Eq + Hash> MembershipIndex<K> {
    /// Create an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self {
            members: HashMap::new(),
        }
    }

    /// Record `key` as held by `id`.
    ///
    /// Returns `false` if the key was already present (index unchanged).
    pub fn insert(&mut self, key: K, id: NodeId) -> bool {
        match self.members.entry(key) {
            std::collections::hash_map::Entry::Occupied(_) => false,
            std::collections::hash_map::Entry::Vacant(slot) => {
                slot.insert(id);
                true
            }
        }
    }

    /// Forget `key`, returning the node that held it.
    pub fn remove(&mut self, key: &K) -> Option<NodeId> {
        self.members.remove(key)
    }

    /// Whether `key` is present.
    #[must_use]
    pub fn contains(&self, key: &K) -> bool {
        self.members.contains_key(key)
    }

    /// Drop every key.
    pub fn clear(&mut self) {
        self.members.clear();
    }
}

impl<K: Eq + Hash> Default for MembershipIndex<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// Read-only view of one of the engine's frontiers.
///
/// Iteration yields nodes in ascending total-cost order, including any stale
/// duplicate entries still waiting to be discarded.
pub struct FrontierView<'a, N: SearchNode> {
    frontier: &'a CostFrontier<NodeId>,
    arena: &'a NodeArena<N>,
    index: &'a MembershipIndex<N::Key>,
}

impl<'a, N: SearchNode> FrontierView<'a, N> {
    pub(crate) fn new(
        frontier: &'a CostFrontier<NodeId>,
        arena: &'a NodeArena<N>,
        index: &'a MembershipIndex<N::Key>,
    ) -> Self {
        Self {
            frontier,
            arena,
            index,
        }
    }

    /// Whether a node with the same state key is a member (hashed lookup).
    #[must_use]
    pub fn contains(&self, node: &N) -> bool {
        self.index.contains(&node.state_key())
    }

    /// Number of frontier entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.frontier.len()
    }

    /// Whether the frontier has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frontier.is_empty()
    }

    /// Nodes in ascending total-cost order.
    pub fn iter(&self) -> impl Iterator<Item = &'a N> + 'a {
        let arena = self.arena;
        self.frontier.values().map(move |&id| arena.node(id))
    }
}

impl<N: SearchNode> Clone for FrontierView<'_, N> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<N: SearchNode> Copy for FrontierView<'_, N> {}
