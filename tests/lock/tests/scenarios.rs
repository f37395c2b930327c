//! Lock tests for the three reference scenarios: open grid, one-move puzzle,
//! walled-in start.

use std::sync::Arc;

use astral_search::{AStar, SearchNode, SearchPolicyV1, SearchState};
use astral_worlds::{GridMap, TilePuzzle};
use lock_tests::search_test_helpers::{
    assert_no_duplicate_expansion, assert_path_valid, assert_step_accounting, grid, grid_engine,
    positions,
};

// ---------------------------------------------------------------------------
// SCENARIO A: 5x5 open grid, corner to corner
// ---------------------------------------------------------------------------

#[test]
fn open_grid_corner_to_corner() {
    let map = Arc::new(GridMap::new(5, 5).unwrap());
    let mut engine = grid_engine(&map, (0, 0), (4, 4), SearchPolicyV1::default());

    assert_eq!(engine.run().unwrap(), SearchState::GoalFound);

    let path = positions(&engine);
    assert_eq!(path.len(), 9, "8 moves, 9 nodes");
    assert_eq!(path[0], (0, 0));
    assert_eq!(path[8], (4, 4));
    assert_eq!(engine.current_node().movement_cost(), 8);
    assert!(engine.step_count() >= 9);

    assert_path_valid(&engine, &(0, 0));
    assert_no_duplicate_expansion(&engine);
    assert_step_accounting(&engine);
}

#[test]
fn open_grid_steps_one_expansion_at_a_time() {
    let map = Arc::new(GridMap::new(5, 5).unwrap());
    let mut engine = grid_engine(&map, (0, 0), (4, 4), SearchPolicyV1::default());

    assert_eq!(engine.step().unwrap(), SearchState::Searching);
    assert_eq!(engine.step_count(), 1);
    assert_eq!(engine.closed_list().len(), 1);
    assert_eq!(engine.open_list().len(), 2, "east and south of the corner");
    assert_eq!(engine.path().len(), 1);
}

// ---------------------------------------------------------------------------
// SCENARIO B: 3x3 puzzle one legal move from the goal
// ---------------------------------------------------------------------------

#[test]
fn one_move_puzzle_solves_in_one_move() {
    let goal = TilePuzzle::goal(3).unwrap();
    for start in goal.children().unwrap() {
        let mut engine = AStar::new(start.clone(), TilePuzzle::goal(3).unwrap()).unwrap();
        assert_eq!(engine.run().unwrap(), SearchState::GoalFound);

        let path = engine.path();
        assert_eq!(path.len(), 2, "start then goal");
        assert_eq!(path[0].tiles(), start.tiles());
        assert_eq!(path[1].tiles(), goal.tiles());
        assert_eq!(engine.step_count(), 2);
    }
}

// ---------------------------------------------------------------------------
// SCENARIO C: start walled in on all four sides
// ---------------------------------------------------------------------------

#[test]
fn walled_in_start_fails() {
    let map = grid(
        "
        .#.
        #.#
        .#.
        ",
    );
    let mut engine = grid_engine(&map, (1, 1), (2, 2), SearchPolicyV1::default());

    assert_eq!(engine.run().unwrap(), SearchState::Failed);
    assert_eq!(engine.closed_list().len(), 1);
    assert_eq!(
        engine.closed_list().iter().next().unwrap().position(),
        (1, 1)
    );
    assert!(engine.open_list().is_empty());
    assert_step_accounting(&engine);
}

#[test]
fn failed_search_stays_failed() {
    let map = grid("..#..");
    let mut engine = grid_engine(&map, (0, 0), (4, 0), SearchPolicyV1::default());

    assert_eq!(engine.run().unwrap(), SearchState::Failed);
    let steps = engine.step_count();
    assert_eq!(engine.step().unwrap(), SearchState::Failed);
    assert_eq!(engine.step_count(), steps);
    assert_eq!(engine.closed_list().len(), 2);
}
