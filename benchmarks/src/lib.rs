//! Shared fixtures for the astral benchmark suites.

use std::sync::Arc;

use astral_search::{AStar, SearchNode, SearchState};
use astral_worlds::{AdjacencyGraph, GridMap, PuzzleHeuristic, TilePuzzle};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Fixed seed so every bench iteration sees the same instance.
pub const BENCH_SEED: u64 = 42;

/// A `size x size` map with a serpentine wall pattern: every other row is
/// walled except for one gap, alternating sides.
///
/// # Panics
///
/// Panics if `size` is zero.
#[must_use]
pub fn serpentine(size: usize) -> Arc<GridMap> {
    let mut map = GridMap::new(size, size).unwrap();
    for y in (1..size).step_by(2) {
        let gap = if (y / 2) % 2 == 0 { size - 1 } else { 0 };
        for x in (0..size).filter(|&x| x != gap) {
            map.set_wall((x, y), true).unwrap();
        }
    }
    Arc::new(map)
}

/// Seeded scrambled board with its goal.
///
/// # Panics
///
/// Panics if `side` is out of range.
#[must_use]
pub fn scrambled(side: usize, moves: usize, heuristic: PuzzleHeuristic) -> (TilePuzzle, TilePuzzle) {
    let goal = TilePuzzle::goal(side).unwrap();
    let start = goal
        .shuffled(moves, &mut ChaCha8Rng::seed_from_u64(BENCH_SEED))
        .unwrap()
        .with_heuristic(heuristic);
    (start, goal)
}

/// Random sparse digraph over `vertices` vertices with `degree` outgoing
/// edges each, plus a chain `0 -> 1 -> ... -> n-1` so the last vertex is
/// reachable from the first.
///
/// # Panics
///
/// Panics if `vertices` is zero.
#[must_use]
pub fn random_graph(vertices: usize, degree: usize) -> Arc<AdjacencyGraph> {
    let mut rng = ChaCha8Rng::seed_from_u64(BENCH_SEED);
    let mut graph = AdjacencyGraph::new(vertices);
    for v in 0..vertices {
        if v + 1 < vertices {
            graph.add_edge(v, v + 1, 10).unwrap();
        }
        for _ in 0..degree {
            let to = rng.random_range(0..vertices);
            let cost = rng.random_range(1..20);
            graph.add_edge(v, to, cost).unwrap();
        }
    }
    Arc::new(graph)
}

/// Run to completion and return the outcome with the step count.
///
/// # Panics
///
/// Panics if the endpoints are incompatible or the domain fails.
pub fn solve<N: SearchNode>(start: N, goal: N) -> (SearchState, u64) {
    let mut engine = AStar::new(start, goal).unwrap();
    let state = engine.run().unwrap();
    (state, engine.step_count())
}
