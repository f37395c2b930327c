//! Astral Search: resumable best-first (A*) search over explicit or implicit
//! graphs.
//!
//! Domains implement [`SearchNode`]; the engine supplies frontier
//! management, the step-wise state machine, and path extraction.
//!
//! # Crate dependency graph
//!
//! ```text
//! astral_search  ←  astral_worlds
//! (engine)          (grid, tile puzzle, adjacency graph)
//! ```
//!
//! # Key types
//!
//! - [`SearchNode`]: the node capability contract
//! - [`CostFrontier`]: ordered multi-container keyed by total cost
//! - [`AStar`]: the engine (`step` / `run` / `reset` / `path`)
//! - [`SearchState`]: `Searching`, `GoalFound`, `Failed`
//! - [`SearchPolicyV1`]: tie-break, tracing, and allocation settings
//! - [`ExpansionTraceV1`]: optional expansion audit log

#![forbid(unsafe_code)]

pub mod contract;
pub mod digest;
pub mod error;
pub mod frontier;
pub mod membership;
pub mod node;
pub mod path;
pub mod policy;
pub mod search;
pub mod trace;

pub use contract::{Cost, SearchNode};
pub use error::SearchError;
pub use frontier::CostFrontier;
pub use membership::FrontierView;
pub use node::NodeId;
pub use policy::{SearchPolicyV1, TieBreakV1};
pub use search::{AStar, SearchState, SearchStats};
pub use trace::ExpansionTraceV1;
