//! Astral Worlds: concrete domains for the `astral_search` engine.
//!
//! Each world implements [`astral_search::SearchNode`] and is used by the
//! lock tests and benchmarks.
//!
//! - [`grid`]: 4-connected grid with walls, Manhattan heuristic
//! - [`puzzle`]: sliding-tile puzzle, Manhattan or Nilsson sequence heuristic
//! - [`graph`]: explicit weighted digraph with a heuristic table

#![forbid(unsafe_code)]

pub mod error;
pub mod graph;
pub mod grid;
pub mod puzzle;

pub use error::WorldError;
pub use graph::{AdjacencyGraph, GraphNode};
pub use grid::{GridCell, GridMap, Position};
pub use puzzle::{PuzzleHeuristic, TilePuzzle};
