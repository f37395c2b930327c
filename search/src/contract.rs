//! Node capability contract.

use std::fmt::Debug;
use std::hash::Hash;

use crate::membership::FrontierView;

/// Integer path cost (movement, estimate, and total).
pub type Cost = i64;

/// Trait for states that support best-first search.
///
/// The engine owns every node value it is handed (start, goal, and each
/// child returned by [`SearchNode::children`]). It never clones nodes.
///
/// # Contract
///
/// - `set_movement_cost` and `set_estimated_cost` are called by the engine
///   at most once per node value, when the node is first discovered. A
///   child that is already in open or closed is dropped without being
///   costed.
/// - Once a node is inserted into a frontier its costs are final. The engine
///   only touches it again through `set_in_open` / `set_in_closed`.
/// - `children` must be finite and restartable: calling it twice on the same
///   node yields the same successors in the same order.
/// - `state_key` equality must agree with `is_goal`: two nodes with equal
///   keys are the same logical state.
pub trait SearchNode: Sized {
    /// Identity of the logical state, used by the engine's membership index.
    type Key: Eq + Hash + Clone + Debug;

    /// Successor sequence. May be computed on demand (implicit graph) or
    /// read from a precomputed adjacency (explicit graph).
    type Children: IntoIterator<Item = Self>;

    /// Domain contract violation raised while generating successors.
    type Error: std::error::Error + Send + Sync + 'static;

    /// The state identity of this node.
    fn state_key(&self) -> Self::Key;

    /// Accumulated cost from the start (g).
    fn movement_cost(&self) -> Cost;

    /// Heuristic estimate of the remaining cost to the goal (h).
    fn estimated_cost(&self) -> Cost;

    /// `movement_cost + estimated_cost` (f), the frontier ordering key.
    fn total_cost(&self) -> Cost {
        self.movement_cost().saturating_add(self.estimated_cost())
    }

    /// Set g from the parent's g plus the cost of the edge into `self`.
    fn set_movement_cost(&mut self, parent: &Self);

    /// Set h as the heuristic distance from `self` to `goal`.
    fn set_estimated_cost(&mut self, goal: &Self);

    /// Generate successor states.
    ///
    /// # Errors
    ///
    /// Returns the domain's error when the node cannot produce a sound
    /// successor set. The engine treats this as fatal.
    fn children(&self) -> Result<Self::Children, Self::Error>;

    /// Whether `self` is the goal state.
    fn is_goal(&self, goal: &Self) -> bool {
        self.state_key() == goal.state_key()
    }

    /// Whether this logical state currently occupies the open frontier.
    ///
    /// The default consults the engine's hashed index. Domains may instead
    /// scan `open` with their own equality.
    fn is_in_open(&self, open: &FrontierView<'_, Self>) -> bool {
        open.contains(self)
    }

    /// Notification that this node entered (`true`) or left (`false`) open.
    fn set_in_open(&mut self, _in_open: bool) {}

    /// Whether this logical state has already been expanded.
    fn is_in_closed(&self, closed: &FrontierView<'_, Self>) -> bool {
        closed.contains(self)
    }

    /// Notification that this node entered (`true`) or left (`false`) closed.
    fn set_in_closed(&mut self, _in_closed: bool) {}

    /// Whether `self` and `other` belong to the same search space
    /// (e.g. equal puzzle dimensions). Checked for start/goal pairs.
    fn compatible_with(&self, _other: &Self) -> bool {
        true
    }
}
