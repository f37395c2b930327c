//! `ExpansionTraceV1`: expansion-event audit log.
//!
//! The normative surface is the ordered list of `ExpandEventV1` entries.
//! Two runs over the same inputs with the same policy produce byte-identical
//! canonical JSON and therefore the same digest.

use crate::contract::Cost;
use crate::digest::{canonical_hash, TraceDigest, DOMAIN_SEARCH_TRACE};
use crate::error::SearchError;
use crate::node::NodeId;
use crate::policy::SearchPolicyV1;
use crate::search::SearchStats;

/// The complete expansion audit trail of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpansionTraceV1 {
    /// Ordered expansion events.
    pub expansions: Vec<ExpandEventV1>,
    /// Run-level metadata.
    pub metadata: TraceMetadataV1,
}

/// A single frontier pop that led to an expansion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpandEventV1 {
    /// Total order of expansions (0-based).
    pub expansion_order: u64,
    /// Value of the engine's step counter during this expansion.
    pub step: u64,
    pub node_id: NodeId,
    pub parent_id: Option<NodeId>,
    pub depth: u32,
    /// `Debug` rendering of the node's state key.
    pub state: String,
    pub movement_cost: Cost,
    pub estimated_cost: Cost,
    pub total_cost: Cost,
    pub is_goal: bool,
    /// Children inserted into open, in generation order.
    pub children_added: Vec<NodeId>,
    /// Children dropped because their state was already in open or closed.
    pub duplicates_suppressed: u64,
    /// Stale open entries discarded before this node was popped.
    pub stale_discarded: u64,
}

/// Run-level trace metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceMetadataV1 {
    pub start_state: String,
    pub goal_state: String,
    /// The policy the run was configured with.
    pub policy: SearchPolicyV1,
    /// `None` while the search is still running.
    pub termination: Option<TerminationV1>,
    pub step_count: u64,
    pub stats: SearchStats,
}

/// Why the search stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationV1 {
    /// The goal was popped and expanded.
    GoalReached { node_id: NodeId },
    /// Open emptied without reaching the goal.
    FrontierExhausted,
    /// The domain failed to generate children for this node.
    DomainFault { node_id: NodeId },
}

impl ExpansionTraceV1 {
    pub(crate) fn new(start_state: String, goal_state: String, policy: SearchPolicyV1) -> Self {
        Self {
            expansions: Vec::new(),
            metadata: TraceMetadataV1 {
                start_state,
                goal_state,
                policy,
                termination: None,
                step_count: 0,
                stats: SearchStats::default(),
            },
        }
    }

    /// Serialize the trace to canonical JSON bytes (sorted keys, compact).
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::TraceSerialization`] if serialization fails.
    pub fn to_canonical_json_bytes(&self) -> Result<Vec<u8>, SearchError> {
        Ok(serde_json::to_vec(&self.to_json_value())?)
    }

    /// Content digest of the canonical JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::TraceSerialization`] if serialization fails.
    pub fn digest(&self) -> Result<TraceDigest, SearchError> {
        let bytes = self.to_canonical_json_bytes()?;
        Ok(canonical_hash(DOMAIN_SEARCH_TRACE, &bytes))
    }

    /// Convert to a `serde_json::Value`.
    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        serde_json::json!({
            "expansions": self.expansions.iter().map(expand_event_to_json).collect::<Vec<_>>(),
            "metadata": metadata_to_json(&self.metadata),
        })
    }
}

fn expand_event_to_json(e: &ExpandEventV1) -> serde_json::Value {
    serde_json::json!({
        "children_added": e.children_added.iter().map(|id| id.index()).collect::<Vec<_>>(),
        "depth": e.depth,
        "duplicates_suppressed": e.duplicates_suppressed,
        "estimated_cost": e.estimated_cost,
        "expansion_order": e.expansion_order,
        "is_goal": e.is_goal,
        "movement_cost": e.movement_cost,
        "node_id": e.node_id.index(),
        "parent_id": e.parent_id.map(NodeId::index),
        "stale_discarded": e.stale_discarded,
        "state": e.state,
        "step": e.step,
        "total_cost": e.total_cost,
    })
}

fn metadata_to_json(m: &TraceMetadataV1) -> serde_json::Value {
    serde_json::json!({
        "goal_state": m.goal_state,
        "policy": m.policy.to_json_value(),
        "start_state": m.start_state,
        "stats": {
            "children_generated": m.stats.children_generated,
            "duplicates_suppressed": m.stats.duplicates_suppressed,
            "expansions": m.stats.expansions,
            "open_high_water": m.stats.open_high_water,
            "stale_discarded": m.stats.stale_discarded,
        },
        "step_count": m.step_count,
        "termination": m.termination.map(termination_to_json),
    })
}

fn termination_to_json(t: TerminationV1) -> serde_json::Value {
    match t {
        TerminationV1::GoalReached { node_id } => {
            serde_json::json!({"node_id": node_id.index(), "type": "goal_reached"})
        }
        TerminationV1::FrontierExhausted => serde_json::json!({"type": "frontier_exhausted"}),
        TerminationV1::DomainFault { node_id } => {
            serde_json::json!({"node_id": node_id.index(), "type": "domain_fault"})
        }
    }
}
