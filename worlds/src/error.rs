//! Error types for world construction and successor generation.

use thiserror::Error;

/// Typed failure for world operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorldError {
    /// A dimension, length, or table size is unusable.
    #[error("invalid shape: {detail}")]
    InvalidShape { detail: String },

    /// A puzzle lists the same tile twice.
    #[error("tile {tile} appears more than once")]
    DuplicateTile { tile: u8 },

    /// A puzzle has no blank tile, so no move can be generated.
    #[error("puzzle has no blank tile")]
    MissingBlank,

    /// A coordinate lies outside the grid.
    #[error("cell ({x}, {y}) is outside a {width}x{height} grid")]
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },

    /// A vertex index is not part of the graph.
    #[error("vertex {vertex} not in graph of {count} vertices")]
    UnknownVertex { vertex: usize, count: usize },

    /// A textual map could not be parsed.
    #[error("parse error at line {line}: {detail}")]
    Parse { line: usize, detail: String },
}
