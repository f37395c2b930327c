//! Typed search errors.
//!
//! `SearchError` covers configuration failures and fatal domain faults.
//! Running out of candidates is not an error: it is reported as
//! [`crate::search::SearchState::Failed`].

use thiserror::Error;

use crate::node::NodeId;

/// Boxed domain error raised by a node's child generator.
pub type DomainError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Typed failure for engine construction and stepping.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Start and goal describe different shapes of the same domain
    /// (e.g. a 3x3 puzzle paired with a 4x4 goal).
    #[error("incompatible start/goal: {detail}")]
    IncompatibleEndpoints { detail: String },

    /// A policy option was selected that this engine does not implement.
    #[error("unsupported policy mode: {detail}")]
    UnsupportedPolicyMode { detail: String },

    /// A policy document could not be read.
    #[error("invalid policy: {detail}")]
    InvalidPolicy { detail: String },

    /// The domain failed to generate successors for an expanded node.
    ///
    /// The node has already been moved to the closed frontier. The engine
    /// refuses further steps until it is reset.
    #[error("domain failure while expanding node {node_id}: {source}")]
    Domain {
        node_id: NodeId,
        #[source]
        source: DomainError,
    },

    /// A step was requested after an earlier [`SearchError::Domain`].
    #[error("search faulted at node {node_id}; reset before stepping again")]
    Faulted { node_id: NodeId },

    /// Trace serialization failed.
    #[error("trace serialization failed: {0}")]
    TraceSerialization(#[from] serde_json::Error),
}
