//! Search engine: the resumable step/run state machine.

use log::{debug, info, trace, warn};

use crate::contract::SearchNode;
use crate::error::SearchError;
use crate::frontier::CostFrontier;
use crate::membership::{FrontierView, MembershipIndex};
use crate::node::{NodeArena, NodeId};
use crate::path::reconstruct_path;
use crate::policy::{SearchPolicyV1, MAX_NODE_CAPACITY_HINT};
use crate::trace::{ExpandEventV1, ExpansionTraceV1, TerminationV1};

/// Outcome of one [`AStar::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
    /// More work remains.
    Searching,
    /// The goal was popped from open. Terminal.
    GoalFound,
    /// Open is exhausted; no path exists in the reachable subgraph. Terminal.
    Failed,
}

impl SearchState {
    /// Returns `true` for `GoalFound` and `Failed`.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Searching)
    }
}

/// Running counters for one search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Nodes promoted to closed.
    pub expansions: u64,
    /// Children returned by the domain, before membership filtering.
    pub children_generated: u64,
    /// Children dropped because their state was already in open or closed.
    pub duplicates_suppressed: u64,
    /// Open entries discarded on pop because their state was already closed.
    pub stale_discarded: u64,
    /// Largest open frontier size observed.
    pub open_high_water: usize,
}

/// Resumable A* search over any [`SearchNode`] domain.
///
/// The engine owns every node it discovers in an append-only arena. The
/// open and closed frontiers hold arena ids ordered by total cost, and a
/// hashed index per frontier answers membership queries by state key.
///
/// Drive it with [`AStar::step`] for bounded work, or [`AStar::run`] to
/// completion.
pub struct AStar<N: SearchNode> {
    policy: SearchPolicyV1,
    arena: NodeArena<N>,
    open: CostFrontier<NodeId>,
    closed: CostFrontier<NodeId>,
    open_index: MembershipIndex<N::Key>,
    closed_index: MembershipIndex<N::Key>,
    goal: N,
    current: NodeId,
    step_count: u64,
    state: SearchState,
    /// Node whose child generator failed; latched until `reset`.
    faulted_at: Option<NodeId>,
    stats: SearchStats,
    trace: Option<ExpansionTraceV1>,
}

impl<N: SearchNode> AStar<N> {
    /// Create an engine with the default policy and seed open with `start`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::IncompatibleEndpoints`] if `start` and `goal`
    /// do not belong to the same search space.
    pub fn new(start: N, goal: N) -> Result<Self, SearchError> {
        Self::with_policy(start, goal, SearchPolicyV1::default())
    }

    /// Create an engine with an explicit policy.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::IncompatibleEndpoints`] if `start` and `goal`
    /// do not belong to the same search space.
    pub fn with_policy(start: N, goal: N, policy: SearchPolicyV1) -> Result<Self, SearchError> {
        check_endpoints(&start, &goal)?;
        let mut engine = Self {
            arena: NodeArena::with_capacity(policy.node_capacity_hint.min(MAX_NODE_CAPACITY_HINT)),
            policy,
            open: CostFrontier::new(),
            closed: CostFrontier::new(),
            open_index: MembershipIndex::new(),
            closed_index: MembershipIndex::new(),
            goal,
            current: NodeId::from_index(0),
            step_count: 0,
            state: SearchState::Searching,
            faulted_at: None,
            stats: SearchStats::default(),
            trace: None,
        };
        engine.seed(start);
        Ok(engine)
    }

    /// Discard all search state and start over from `start` towards `goal`.
    ///
    /// Flags on `start` and `goal` are cleared before seeding. Other node
    /// values from a previous run are dropped with the arena; domains that
    /// share flag state between node values must clear it themselves.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::IncompatibleEndpoints`] if `start` and `goal`
    /// do not belong to the same search space. The engine is left unchanged.
    pub fn reset(&mut self, start: N, goal: N) -> Result<(), SearchError> {
        check_endpoints(&start, &goal)?;
        self.open.clear();
        self.closed.clear();
        self.open_index.clear();
        self.closed_index.clear();
        self.arena.clear();
        self.goal = goal;
        self.step_count = 0;
        self.state = SearchState::Searching;
        self.faulted_at = None;
        self.stats = SearchStats::default();
        self.trace = None;
        self.seed(start);
        Ok(())
    }

    fn seed(&mut self, mut start: N) {
        self.goal.set_in_open(false);
        self.goal.set_in_closed(false);
        start.set_in_open(false);
        start.set_in_closed(false);

        start.set_estimated_cost(&self.goal);
        start.set_in_open(true);

        if self.policy.record_trace {
            self.trace = Some(ExpansionTraceV1::new(
                format!("{:?}", start.state_key()),
                format!("{:?}", self.goal.state_key()),
                self.policy.clone(),
            ));
        }

        let key = start.state_key();
        let id = self.arena.insert(start, None);
        self.open_index.insert(key, id);
        self.push_open(id);
        self.current = id;
        debug!("seeded open with {id}");
    }

    fn push_open(&mut self, id: NodeId) {
        let cost = self.arena.node(id).total_cost();
        let rank = self.policy.tie_break.rank(self.arena.depth(id));
        self.open.push_ranked(cost, rank, id);
        self.stats.open_high_water = self.open.high_water();
    }

    /// Perform one unit of work: pop and expand the cheapest open node.
    ///
    /// Stale open entries (states already closed) are discarded within the
    /// same step. Once a terminal state has been returned, further calls
    /// return it again without doing any work.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Domain`] if the expanded node's child generator
    /// fails. The fault is latched: every later `step` or `run` returns
    /// [`SearchError::Faulted`] until [`AStar::reset`].
    pub fn step(&mut self) -> Result<SearchState, SearchError> {
        if let Some(node_id) = self.faulted_at {
            return Err(SearchError::Faulted { node_id });
        }
        if self.state.is_terminal() {
            return Ok(self.state);
        }
        self.step_count += 1;

        let mut stale = 0u64;
        let id = loop {
            let Some(id) = self.open.pop_min() else {
                return Ok(self.finish(SearchState::Failed));
            };
            if self.arena.node(id).is_in_closed(&self.closed_list()) {
                stale += 1;
                self.stats.stale_discarded += 1;
                trace!("discarding stale open entry {id}");
                continue;
            }
            break id;
        };

        // Promote to closed.
        let key = self.arena.node(id).state_key();
        self.open_index.remove(&key);
        {
            let node = self.arena.node_mut(id);
            node.set_in_open(false);
            node.set_in_closed(true);
        }
        let node = self.arena.node(id);
        self.closed.push(node.total_cost(), id);
        self.closed_index.insert(key, id);
        self.current = id;
        self.stats.expansions += 1;
        debug!(
            "step {}: expanding {id} (g={}, h={}, f={})",
            self.step_count,
            node.movement_cost(),
            node.estimated_cost(),
            node.total_cost()
        );

        if node.is_goal(&self.goal) {
            self.record_expansion(id, stale, true, Vec::new(), 0);
            return Ok(self.finish(SearchState::GoalFound));
        }

        let children = match node.children() {
            Ok(children) => children,
            Err(e) => {
                warn!("domain failure while expanding {id}: {e}");
                self.latch_fault(id);
                return Err(SearchError::Domain {
                    node_id: id,
                    source: Box::new(e),
                });
            }
        };

        let mut added = Vec::new();
        let mut suppressed = 0u64;
        for mut child in children {
            self.stats.children_generated += 1;
            if child.is_in_open(&self.open_list()) || child.is_in_closed(&self.closed_list()) {
                suppressed += 1;
                trace!("suppressing known state {:?}", child.state_key());
                continue;
            }
            child.set_movement_cost(self.arena.node(id));
            child.set_estimated_cost(&self.goal);
            child.set_in_open(true);

            let child_key = child.state_key();
            let child_id = self.arena.insert(child, Some(id));
            self.open_index.insert(child_key, child_id);
            self.push_open(child_id);
            added.push(child_id);
        }
        self.stats.duplicates_suppressed += suppressed;

        self.record_expansion(id, stale, false, added, suppressed);
        Ok(SearchState::Searching)
    }

    /// Step until a terminal state is reached.
    ///
    /// There is no iteration bound. Callers that need one should call
    /// [`AStar::step`] directly.
    ///
    /// # Errors
    ///
    /// Propagates the first [`SearchError`] returned by `step`.
    pub fn run(&mut self) -> Result<SearchState, SearchError> {
        loop {
            let state = self.step()?;
            if state.is_terminal() {
                return Ok(state);
            }
        }
    }

    fn finish(&mut self, state: SearchState) -> SearchState {
        self.state = state;
        let termination = match state {
            SearchState::GoalFound => {
                info!(
                    "goal reached at {} after {} steps ({} expansions)",
                    self.current, self.step_count, self.stats.expansions
                );
                Some(TerminationV1::GoalReached {
                    node_id: self.current,
                })
            }
            SearchState::Failed => {
                info!(
                    "open frontier exhausted after {} steps ({} expansions)",
                    self.step_count, self.stats.expansions
                );
                Some(TerminationV1::FrontierExhausted)
            }
            SearchState::Searching => None,
        };
        if let Some(trace) = &mut self.trace {
            trace.metadata.termination = termination;
            trace.metadata.step_count = self.step_count;
            trace.metadata.stats = self.stats;
        }
        state
    }

    fn latch_fault(&mut self, id: NodeId) {
        self.faulted_at = Some(id);
        if let Some(trace) = &mut self.trace {
            trace.metadata.termination = Some(TerminationV1::DomainFault { node_id: id });
            trace.metadata.step_count = self.step_count;
            trace.metadata.stats = self.stats;
        }
    }

    fn record_expansion(
        &mut self,
        id: NodeId,
        stale_discarded: u64,
        is_goal: bool,
        children_added: Vec<NodeId>,
        duplicates_suppressed: u64,
    ) {
        let Some(trace) = &mut self.trace else {
            return;
        };
        let node = self.arena.node(id);
        trace.expansions.push(ExpandEventV1 {
            expansion_order: u64::try_from(trace.expansions.len()).unwrap_or(u64::MAX),
            step: self.step_count,
            node_id: id,
            parent_id: self.arena.parent(id),
            depth: self.arena.depth(id),
            state: format!("{:?}", node.state_key()),
            movement_cost: node.movement_cost(),
            estimated_cost: node.estimated_cost(),
            total_cost: node.total_cost(),
            is_goal,
            children_added,
            duplicates_suppressed,
            stale_discarded,
        });
        trace.metadata.step_count = self.step_count;
        trace.metadata.stats = self.stats;
    }

    /// Nodes from the start to the current node, in that order.
    ///
    /// After `GoalFound` this is the solution path. Mid-search it is the
    /// partial path to the most recently expanded node.
    #[must_use]
    pub fn path(&self) -> Vec<&N> {
        self.path_ids()
            .into_iter()
            .map(|id| self.arena.node(id))
            .collect()
    }

    /// Arena ids from the start to the current node.
    #[must_use]
    pub fn path_ids(&self) -> Vec<NodeId> {
        reconstruct_path(&self.arena, self.current)
    }

    /// Number of `step` calls that did work since construction or reset.
    #[must_use]
    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    /// Read-only view of the open frontier.
    #[must_use]
    pub fn open_list(&self) -> FrontierView<'_, N> {
        FrontierView::new(&self.open, &self.arena, &self.open_index)
    }

    /// Read-only view of the closed frontier.
    #[must_use]
    pub fn closed_list(&self) -> FrontierView<'_, N> {
        FrontierView::new(&self.closed, &self.arena, &self.closed_index)
    }

    /// The most recently expanded node (the start node before any step).
    #[must_use]
    pub fn current_node(&self) -> &N {
        self.arena.node(self.current)
    }

    /// Arena id of [`AStar::current_node`].
    #[must_use]
    pub fn current_id(&self) -> NodeId {
        self.current
    }

    /// The fixed goal.
    #[must_use]
    pub fn goal(&self) -> &N {
        &self.goal
    }

    /// The node stored at `id`.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&N> {
        self.arena.get(id).map(|slot| &slot.node)
    }

    /// Parent link of `id` (`None` for the start node).
    #[must_use]
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.arena.parent(id)
    }

    /// Number of nodes discovered (start plus every child inserted into open).
    #[must_use]
    pub fn discovered(&self) -> usize {
        self.arena.len()
    }

    /// The node whose expansion faulted, if the search is latched on a
    /// domain failure.
    #[must_use]
    pub fn faulted_at(&self) -> Option<NodeId> {
        self.faulted_at
    }

    /// The last state returned by `step` (`Searching` before the first step).
    #[must_use]
    pub fn state(&self) -> SearchState {
        self.state
    }

    /// Running counters.
    #[must_use]
    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// The expansion trace, when the policy records one.
    #[must_use]
    pub fn trace(&self) -> Option<&ExpansionTraceV1> {
        self.trace.as_ref()
    }

    /// The active policy.
    #[must_use]
    pub fn policy(&self) -> &SearchPolicyV1 {
        &self.policy
    }
}

fn check_endpoints<N: SearchNode>(start: &N, goal: &N) -> Result<(), SearchError> {
    if start.compatible_with(goal) {
        Ok(())
    } else {
        Err(SearchError::IncompatibleEndpoints {
            detail: format!(
                "start {:?} is not in the search space of goal {:?}",
                start.state_key(),
                goal.state_key()
            ),
        })
    }
}
