//! Search policy types.

use crate::error::SearchError;

/// Largest accepted `node_capacity_hint`. The arena still grows past it on
/// demand; the cap only bounds the up-front allocation.
pub const MAX_NODE_CAPACITY_HINT: usize = 1 << 20;

/// Engine configuration.
///
/// Every field has a default; a policy document only needs to name the
/// fields it changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPolicyV1 {
    /// How equal-cost frontier entries are ordered.
    pub tie_break: TieBreakV1,
    /// Record an [`crate::trace::ExpansionTraceV1`] while searching.
    pub record_trace: bool,
    /// Initial arena capacity (nodes). Purely an allocation hint; the engine
    /// clamps it to [`MAX_NODE_CAPACITY_HINT`].
    pub node_capacity_hint: usize,
}

impl SearchPolicyV1 {
    /// Parse a policy from a JSON object.
    ///
    /// Recognized keys: `tie_break` (`"insertion_order"` or
    /// `"deepest_first"`), `record_trace` (bool), `node_capacity_hint`
    /// (unsigned integer, at most [`MAX_NODE_CAPACITY_HINT`]). Missing keys
    /// keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidPolicy`] for malformed JSON, a non-object
    /// document, unknown keys, or mistyped values, and
    /// [`SearchError::UnsupportedPolicyMode`] for an unknown tie-break name.
    pub fn from_json_str(text: &str) -> Result<Self, SearchError> {
        let value: serde_json::Value =
            serde_json::from_str(text).map_err(|e| SearchError::InvalidPolicy {
                detail: format!("malformed JSON: {e}"),
            })?;
        let Some(obj) = value.as_object() else {
            return Err(SearchError::InvalidPolicy {
                detail: "policy must be a JSON object".into(),
            });
        };

        let mut policy = Self::default();
        for (key, field) in obj {
            match key.as_str() {
                "tie_break" => {
                    let name = field.as_str().ok_or_else(|| SearchError::InvalidPolicy {
                        detail: "tie_break must be a string".into(),
                    })?;
                    policy.tie_break = TieBreakV1::from_name(name)?;
                }
                "record_trace" => {
                    policy.record_trace =
                        field.as_bool().ok_or_else(|| SearchError::InvalidPolicy {
                            detail: "record_trace must be a boolean".into(),
                        })?;
                }
                "node_capacity_hint" => {
                    let hint = field.as_u64().ok_or_else(|| SearchError::InvalidPolicy {
                        detail: "node_capacity_hint must be an unsigned integer".into(),
                    })?;
                    policy.node_capacity_hint = usize::try_from(hint)
                        .ok()
                        .filter(|&h| h <= MAX_NODE_CAPACITY_HINT)
                        .ok_or_else(|| SearchError::InvalidPolicy {
                            detail: format!(
                                "node_capacity_hint {hint} exceeds {MAX_NODE_CAPACITY_HINT}"
                            ),
                        })?;
                }
                other => {
                    return Err(SearchError::InvalidPolicy {
                        detail: format!("unknown policy key {other:?}"),
                    });
                }
            }
        }
        Ok(policy)
    }

    /// Echo of the policy for trace metadata.
    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        serde_json::json!({
            "node_capacity_hint": self.node_capacity_hint,
            "record_trace": self.record_trace,
            "tie_break": self.tie_break.name(),
        })
    }
}

impl Default for SearchPolicyV1 {
    fn default() -> Self {
        Self {
            tie_break: TieBreakV1::InsertionOrder,
            record_trace: false,
            node_capacity_hint: 1024,
        }
    }
}

/// Ordering among frontier entries with equal total cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TieBreakV1 {
    /// FIFO: the earliest-inserted entry wins. Default.
    InsertionOrder,
    /// The deepest node wins; FIFO among equal depths.
    DeepestFirst,
}

impl TieBreakV1 {
    /// Stable name used in policy documents and traces.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::InsertionOrder => "insertion_order",
            Self::DeepestFirst => "deepest_first",
        }
    }

    /// Parse a stable name.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::UnsupportedPolicyMode`] for unknown names.
    pub fn from_name(name: &str) -> Result<Self, SearchError> {
        match name {
            "insertion_order" => Ok(Self::InsertionOrder),
            "deepest_first" => Ok(Self::DeepestFirst),
            other => Err(SearchError::UnsupportedPolicyMode {
                detail: format!("tie_break {other:?}"),
            }),
        }
    }

    /// Secondary frontier rank for a node at `depth`.
    #[must_use]
    pub fn rank(self, depth: u32) -> u32 {
        match self {
            Self::InsertionOrder => 0,
            Self::DeepestFirst => u32::MAX - depth,
        }
    }
}
