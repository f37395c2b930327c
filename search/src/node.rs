//! Node arena: append-only storage for every discovered node.
//!
//! Children are always fresh values, so parent links form a tree. The arena
//! holds each node with a back-reference (index) to its parent; nothing
//! holds forward references.

use std::fmt;

/// Index of a node in the engine's arena.
///
/// Monotonic in discovery order; the start node is always `#0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Wrap a raw arena index.
    #[must_use]
    pub const fn from_index(index: usize) -> Self {
        Self(index)
    }

    /// The raw arena index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A node together with its position in the search tree.
#[derive(Debug, Clone)]
pub struct NodeSlot<N> {
    pub node: N,
    /// Predecessor on the discovered path (`None` for the start node).
    pub parent: Option<NodeId>,
    /// Tree depth (start = 0).
    pub depth: u32,
}

/// Append-only node storage indexed by [`NodeId`].
#[derive(Debug, Clone)]
pub struct NodeArena<N> {
    slots: Vec<NodeSlot<N>>,
}

impl<N> NodeArena<N> {
    /// Create an empty arena with room for `capacity` nodes.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
        }
    }

    /// Append a node as a child of `parent` and return its id.
    ///
    /// Depth is derived from the parent's depth.
    pub fn insert(&mut self, node: N, parent: Option<NodeId>) -> NodeId {
        let depth = parent.map_or(0, |p| self.slots[p.0].depth.saturating_add(1));
        let id = NodeId(self.slots.len());
        self.slots.push(NodeSlot {
            node,
            parent,
            depth,
        });
        id
    }

    /// The node stored at `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not issued by this arena.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &N {
        &self.slots[id.0].node
    }

    /// Mutable access to the node stored at `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not issued by this arena.
    pub fn node_mut(&mut self, id: NodeId) -> &mut N {
        &mut self.slots[id.0].node
    }

    /// The full slot at `id`, if it exists.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&NodeSlot<N>> {
        self.slots.get(id.0)
    }

    /// Parent of `id` (`None` for the root or an unknown id).
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.slots.get(id.0).and_then(|s| s.parent)
    }

    /// Depth of `id` (0 for the root or an unknown id).
    #[must_use]
    pub fn depth(&self, id: NodeId) -> u32 {
        self.slots.get(id.0).map_or(0, |s| s.depth)
    }

    /// Number of nodes stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the arena is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Drop every node, keeping the allocation.
    pub fn clear(&mut self) {
        self.slots.clear();
    }
}
