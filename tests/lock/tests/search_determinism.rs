//! Lock tests for reproducibility: trace digests across runs, reset
//! idempotence, tie-break policies, and fatal domain errors.

use std::error::Error as _;
use std::sync::Arc;

use astral_search::trace::TerminationV1;
use astral_search::{AStar, SearchError, SearchNode, SearchPolicyV1, SearchState, TieBreakV1};
use astral_worlds::{AdjacencyGraph, GridMap, TilePuzzle, WorldError};
use lock_tests::search_test_helpers::{grid, grid_engine, positions, traced, MAZE};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn maze_trace_bytes(policy: SearchPolicyV1) -> Vec<u8> {
    let map = grid(MAZE);
    let mut engine = grid_engine(&map, (0, 0), (4, 2), policy);
    engine.run().unwrap();
    engine.trace().unwrap().to_canonical_json_bytes().unwrap()
}

// ---------------------------------------------------------------------------
// Determinism
// ---------------------------------------------------------------------------

#[test]
fn trace_bytes_identical_across_runs_n10() {
    let first = maze_trace_bytes(traced());
    for _ in 1..10 {
        assert_eq!(maze_trace_bytes(traced()), first);
    }
}

#[test]
fn shuffled_puzzle_runs_are_reproducible() {
    let goal = TilePuzzle::goal(3).unwrap();
    let run = || {
        let start = goal
            .shuffled(20, &mut ChaCha8Rng::seed_from_u64(0x5EED))
            .unwrap();
        let mut engine = AStar::with_policy(start, goal.clone(), traced()).unwrap();
        engine.run().unwrap();
        engine.trace().unwrap().digest().unwrap()
    };
    let first = run();
    assert!(first.to_string().starts_with("sha256:"));
    assert_eq!(run(), first);
}

#[test]
fn trace_matches_engine_counters() {
    let map = grid(MAZE);
    let mut engine = grid_engine(&map, (0, 0), (4, 2), traced());
    assert_eq!(engine.run().unwrap(), SearchState::GoalFound);

    let trace = engine.trace().unwrap();
    assert_eq!(trace.expansions.len(), engine.closed_list().len());
    assert_eq!(trace.metadata.step_count, engine.step_count());
    assert_eq!(trace.metadata.stats, engine.stats());
    assert_eq!(
        trace.metadata.termination,
        Some(TerminationV1::GoalReached {
            node_id: engine.current_id()
        })
    );
    assert_eq!(trace.metadata.start_state, "(0, 0)");
    assert_eq!(trace.metadata.goal_state, "(4, 2)");

    let last = trace.expansions.last().unwrap();
    assert!(last.is_goal);
    assert_eq!(last.node_id, engine.current_id());
    for (i, event) in trace.expansions.iter().enumerate() {
        assert_eq!(event.expansion_order, i as u64);
    }
}

#[test]
fn failed_trace_records_exhaustion() {
    let map = grid("..#..");
    let mut engine = grid_engine(&map, (0, 0), (4, 0), traced());
    assert_eq!(engine.run().unwrap(), SearchState::Failed);
    let trace = engine.trace().unwrap();
    assert_eq!(
        trace.metadata.termination,
        Some(TerminationV1::FrontierExhausted)
    );
    assert_eq!(trace.expansions.len(), 2);
    assert_eq!(trace.metadata.step_count, 3);
}

// ---------------------------------------------------------------------------
// Reset idempotence
// ---------------------------------------------------------------------------

#[test]
fn reset_then_run_matches_fresh_engine() {
    let map = grid(MAZE);
    let mut fresh = grid_engine(&map, (0, 0), (4, 2), traced());
    fresh.run().unwrap();

    let mut reused = grid_engine(&map, (6, 4), (0, 4), traced());
    reused.run().unwrap();
    reused
        .reset(map.cell(0, 0).unwrap(), map.cell(4, 2).unwrap())
        .unwrap();
    assert_eq!(reused.step_count(), 0);
    assert_eq!(reused.state(), SearchState::Searching);
    assert_eq!(reused.run().unwrap(), fresh.state());

    assert_eq!(positions(&reused), positions(&fresh));
    assert_eq!(
        reused.trace().unwrap().digest().unwrap(),
        fresh.trace().unwrap().digest().unwrap()
    );
}

#[test]
fn reset_mid_search_discards_progress() {
    let map = Arc::new(GridMap::new(6, 6).unwrap());
    let mut fresh = grid_engine(&map, (0, 0), (5, 5), traced());
    fresh.run().unwrap();

    let mut engine = grid_engine(&map, (0, 0), (5, 5), traced());
    for _ in 0..5 {
        engine.step().unwrap();
    }
    engine
        .reset(map.cell(0, 0).unwrap(), map.cell(5, 5).unwrap())
        .unwrap();
    assert_eq!(engine.open_list().len(), 1);
    assert!(engine.closed_list().is_empty());
    assert_eq!(engine.run().unwrap(), SearchState::GoalFound);
    assert_eq!(
        engine.trace().unwrap().to_canonical_json_bytes().unwrap(),
        fresh.trace().unwrap().to_canonical_json_bytes().unwrap()
    );
}

#[test]
fn reset_clears_flags_on_reused_endpoints() {
    let mut graph = AdjacencyGraph::new(3);
    graph.add_edge(0, 1, 2).unwrap();
    graph.add_edge(1, 2, 2).unwrap();
    let graph = Arc::new(graph);

    let mut engine = AStar::new(graph.node(0).unwrap(), graph.node(2).unwrap()).unwrap();
    engine.run().unwrap();
    let first: Vec<usize> = engine.path().iter().map(|n| n.vertex()).collect();

    // Endpoints copied out of a finished run carry stale flags.
    let start = engine.path()[0].clone();
    let goal = engine.current_node().clone();
    assert!(start.in_closed() && goal.in_closed());

    engine.reset(start, goal).unwrap();
    assert!(engine.current_node().in_open());
    assert!(!engine.current_node().in_closed());
    assert!(!engine.goal().in_closed());
    assert_eq!(engine.run().unwrap(), SearchState::GoalFound);
    let second: Vec<usize> = engine.path().iter().map(|n| n.vertex()).collect();
    assert_eq!(first, second);
}

// ---------------------------------------------------------------------------
// Tie-break policies
// ---------------------------------------------------------------------------

#[test]
fn deepest_first_runs_straight_to_the_goal() {
    let map = Arc::new(GridMap::new(5, 5).unwrap());
    let policy = SearchPolicyV1 {
        tie_break: TieBreakV1::DeepestFirst,
        ..traced()
    };
    let mut deep = grid_engine(&map, (0, 0), (4, 4), policy);
    let mut fifo = grid_engine(&map, (0, 0), (4, 4), traced());

    assert_eq!(deep.run().unwrap(), SearchState::GoalFound);
    assert_eq!(fifo.run().unwrap(), SearchState::GoalFound);
    assert_eq!(deep.current_node().movement_cost(), 8);
    assert_eq!(fifo.current_node().movement_cost(), 8);

    assert_eq!(deep.closed_list().len(), 9);
    assert_eq!(fifo.closed_list().len(), 25);
    assert_eq!(
        positions(&deep),
        vec![
            (0, 0),
            (1, 0),
            (2, 0),
            (3, 0),
            (4, 0),
            (4, 1),
            (4, 2),
            (4, 3),
            (4, 4)
        ]
    );
    assert_ne!(
        deep.trace().unwrap().digest().unwrap(),
        fifo.trace().unwrap().digest().unwrap()
    );
}

#[test]
fn policy_document_drives_engine() {
    let policy = SearchPolicyV1::from_json_str(
        r#"{"tie_break": "deepest_first", "record_trace": true, "node_capacity_hint": 64}"#,
    )
    .unwrap();
    let map = Arc::new(GridMap::new(5, 5).unwrap());
    let mut engine = grid_engine(&map, (0, 0), (4, 4), policy);
    engine.run().unwrap();

    assert_eq!(engine.policy().tie_break, TieBreakV1::DeepestFirst);
    let trace = engine.trace().unwrap();
    assert_eq!(trace.metadata.policy.tie_break, TieBreakV1::DeepestFirst);
    assert_eq!(trace.expansions.len(), 9);

    let err = SearchPolicyV1::from_json_str(r#"{"tie_break": "random"}"#).unwrap_err();
    assert!(matches!(err, SearchError::UnsupportedPolicyMode { .. }));

    let err = SearchPolicyV1::from_json_str(r#"{"node_capacity_hint": 18446744073709551615}"#)
        .unwrap_err();
    assert!(matches!(err, SearchError::InvalidPolicy { .. }));
}

// ---------------------------------------------------------------------------
// Fatal errors
// ---------------------------------------------------------------------------

#[test]
fn missing_blank_is_fatal_domain_error() {
    let start = TilePuzzle::new(2, vec![1, 2, 3, 4]).unwrap();
    let goal = TilePuzzle::new(2, vec![2, 1, 3, 4]).unwrap();
    let mut engine = AStar::new(start, goal).unwrap();

    let err = engine.step().unwrap_err();
    assert_eq!(
        err.to_string(),
        "domain failure while expanding node #0: puzzle has no blank tile"
    );
    let source = err.source().unwrap();
    assert_eq!(
        source.downcast_ref::<WorldError>(),
        Some(&WorldError::MissingBlank)
    );
    assert_eq!(engine.closed_list().len(), 1);
}

#[test]
fn domain_fault_blocks_further_steps_until_reset() {
    let start = TilePuzzle::new(2, vec![1, 2, 3, 4]).unwrap();
    let goal = TilePuzzle::new(2, vec![2, 1, 3, 4]).unwrap();
    let mut engine = AStar::with_policy(start, goal.clone(), traced()).unwrap();

    assert!(matches!(engine.run(), Err(SearchError::Domain { .. })));
    let err = engine.run().unwrap_err();
    assert_eq!(
        err.to_string(),
        "search faulted at node #0; reset before stepping again"
    );
    assert!(matches!(engine.step(), Err(SearchError::Faulted { .. })));
    assert_eq!(engine.step_count(), 1);
    assert_eq!(
        engine.trace().unwrap().metadata.termination,
        Some(TerminationV1::DomainFault {
            node_id: engine.current_id()
        })
    );

    engine.reset(goal.clone(), goal).unwrap();
    assert_eq!(engine.faulted_at(), None);
    assert_eq!(engine.run().unwrap(), SearchState::GoalFound);
}

#[test]
fn mismatched_puzzle_sizes_rejected_up_front() {
    let err = AStar::new(
        TilePuzzle::goal(3).unwrap(),
        TilePuzzle::goal(4).unwrap(),
    )
    .err()
    .unwrap();
    assert!(matches!(err, SearchError::IncompatibleEndpoints { .. }));

    let mut engine = AStar::new(
        TilePuzzle::goal(3).unwrap(),
        TilePuzzle::goal(3).unwrap(),
    )
    .unwrap();
    assert!(engine
        .reset(TilePuzzle::goal(2).unwrap(), TilePuzzle::goal(3).unwrap())
        .is_err());
    assert_eq!(engine.run().unwrap(), SearchState::GoalFound);
    assert_eq!(engine.current_node().state_key().len(), 9);
}
