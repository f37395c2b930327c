//! `GraphNode`: explicit weighted directed graph.
//!
//! Unlike the grid and puzzle worlds, graph nodes answer membership queries
//! themselves by scanning the frontier view, and record the open/closed
//! notifications in flags.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::convert::Infallible;
use std::sync::Arc;

use astral_search::{Cost, FrontierView, SearchNode};

use crate::error::WorldError;

/// Adjacency lists with non-negative edge costs and an optional
/// per-vertex heuristic table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdjacencyGraph {
    edges: Vec<Vec<(usize, Cost)>>,
    heuristic: Option<Vec<Cost>>,
}

impl AdjacencyGraph {
    /// A graph of `vertices` isolated vertices.
    #[must_use]
    pub fn new(vertices: usize) -> Self {
        Self {
            edges: vec![Vec::new(); vertices],
            heuristic: None,
        }
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.edges.len()
    }

    fn check(&self, vertex: usize) -> Result<(), WorldError> {
        if vertex < self.edges.len() {
            Ok(())
        } else {
            Err(WorldError::UnknownVertex {
                vertex,
                count: self.edges.len(),
            })
        }
    }

    /// Add a directed edge. Children are generated in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::UnknownVertex`] for an endpoint out of range and
    /// [`WorldError::InvalidShape`] for a negative cost.
    pub fn add_edge(&mut self, from: usize, to: usize, cost: Cost) -> Result<(), WorldError> {
        self.check(from)?;
        self.check(to)?;
        if cost < 0 {
            return Err(WorldError::InvalidShape {
                detail: format!("edge {from} -> {to} has negative cost {cost}"),
            });
        }
        self.edges[from].push((to, cost));
        Ok(())
    }

    /// Add edges in both directions.
    ///
    /// # Errors
    ///
    /// Same as [`AdjacencyGraph::add_edge`].
    pub fn add_undirected(&mut self, a: usize, b: usize, cost: Cost) -> Result<(), WorldError> {
        self.add_edge(a, b, cost)?;
        self.add_edge(b, a, cost)
    }

    /// Install a heuristic table, one estimate per vertex. Without one
    /// every estimate is zero.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidShape`] if the table length differs from
    /// the vertex count.
    pub fn set_heuristic(&mut self, table: Vec<Cost>) -> Result<(), WorldError> {
        if table.len() != self.edges.len() {
            return Err(WorldError::InvalidShape {
                detail: format!(
                    "heuristic table has {} entries for {} vertices",
                    table.len(),
                    self.edges.len()
                ),
            });
        }
        self.heuristic = Some(table);
        Ok(())
    }

    /// Outgoing `(target, cost)` pairs of `vertex`.
    #[must_use]
    pub fn neighbours(&self, vertex: usize) -> &[(usize, Cost)] {
        self.edges.get(vertex).map_or(&[], Vec::as_slice)
    }

    fn estimate(&self, vertex: usize) -> Cost {
        self.heuristic
            .as_ref()
            .and_then(|table| table.get(vertex).copied())
            .unwrap_or(0)
    }

    /// A search node at `vertex`.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::UnknownVertex`] if `vertex` is out of range.
    pub fn node(self: &Arc<Self>, vertex: usize) -> Result<GraphNode, WorldError> {
        self.check(vertex)?;
        Ok(GraphNode::fresh(Arc::clone(self), vertex, 0))
    }

    /// Cheapest path cost from `from` to `to` (Dijkstra).
    ///
    /// Brute-force reference for checking search results.
    #[must_use]
    pub fn dijkstra_cost(&self, from: usize, to: usize) -> Option<Cost> {
        if self.check(from).is_err() || self.check(to).is_err() {
            return None;
        }
        let mut best = vec![None; self.edges.len()];
        let mut heap = BinaryHeap::from([Reverse((0, from))]);
        best[from] = Some(0);
        while let Some(Reverse((cost, v))) = heap.pop() {
            if best[v].is_some_and(|b| cost > b) {
                continue;
            }
            if v == to {
                return Some(cost);
            }
            for &(w, c) in &self.edges[v] {
                let next = cost.saturating_add(c);
                if best[w].map_or(true, |b| next < b) {
                    best[w] = Some(next);
                    heap.push(Reverse((next, w)));
                }
            }
        }
        None
    }
}

/// A vertex of an [`AdjacencyGraph`] as a search node.
#[derive(Debug, Clone)]
pub struct GraphNode {
    graph: Arc<AdjacencyGraph>,
    vertex: usize,
    /// Cost of the edge this node was generated through.
    edge_cost: Cost,
    g: Cost,
    h: Cost,
    in_open: bool,
    in_closed: bool,
}

impl GraphNode {
    fn fresh(graph: Arc<AdjacencyGraph>, vertex: usize, edge_cost: Cost) -> Self {
        Self {
            graph,
            vertex,
            edge_cost,
            g: 0,
            h: 0,
            in_open: false,
            in_closed: false,
        }
    }

    #[must_use]
    pub fn vertex(&self) -> usize {
        self.vertex
    }

    /// Last value passed to `set_in_open`.
    #[must_use]
    pub fn in_open(&self) -> bool {
        self.in_open
    }

    /// Last value passed to `set_in_closed`.
    #[must_use]
    pub fn in_closed(&self) -> bool {
        self.in_closed
    }
}

impl SearchNode for GraphNode {
    type Key = usize;
    type Children = Vec<GraphNode>;
    type Error = Infallible;

    fn state_key(&self) -> usize {
        self.vertex
    }

    fn movement_cost(&self) -> Cost {
        self.g
    }

    fn estimated_cost(&self) -> Cost {
        self.h
    }

    fn set_movement_cost(&mut self, parent: &Self) {
        self.g = parent.g.saturating_add(self.edge_cost);
    }

    fn set_estimated_cost(&mut self, _goal: &Self) {
        self.h = self.graph.estimate(self.vertex);
    }

    fn children(&self) -> Result<Vec<GraphNode>, Infallible> {
        Ok(self
            .graph
            .neighbours(self.vertex)
            .iter()
            .map(|&(to, cost)| GraphNode::fresh(Arc::clone(&self.graph), to, cost))
            .collect())
    }

    fn is_in_open(&self, open: &FrontierView<'_, Self>) -> bool {
        open.iter().any(|n| n.vertex == self.vertex)
    }

    fn set_in_open(&mut self, flag: bool) {
        self.in_open = flag;
    }

    fn is_in_closed(&self, closed: &FrontierView<'_, Self>) -> bool {
        closed.iter().any(|n| n.vertex == self.vertex)
    }

    fn set_in_closed(&mut self, flag: bool) {
        self.in_closed = flag;
    }

    fn compatible_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.graph, &other.graph)
    }
}
