//! Path reconstruction via parent links.

use crate::node::{NodeArena, NodeId};

/// Reconstruct the path from the root to `tip`.
///
/// Walks `tip → parent → … → root` and reverses, so the result starts at the
/// root and ends at `tip`. An id the arena never issued yields just `[tip]`.
#[must_use]
pub fn reconstruct_path<N>(arena: &NodeArena<N>, tip: NodeId) -> Vec<NodeId> {
    let mut path = Vec::with_capacity(arena.depth(tip) as usize + 1);
    let mut current = Some(tip);

    while let Some(id) = current {
        path.push(id);
        current = arena.parent(id);
    }

    path.reverse();
    path
}
