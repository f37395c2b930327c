//! Fixture builders and structural checks shared by the lock tests.
//!
//! The checks panic with a descriptive message; they are meant to be called
//! from `#[test]` functions only.

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use astral_search::{AStar, SearchNode, SearchPolicyV1, SearchState};
use astral_worlds::{GridCell, GridMap, Position};
use rand::Rng;

/// 7x5 map on which first discovery of an intermediate cell is not via a
/// shortest route. From `(0, 0)` to `(6, 4)` the engine reports cost 14;
/// the shortest path costs 12.
pub const OVERCOST_MAP: &str = "
    .##...#
    .#....#
    .#.....
    ...#.#.
    .....#.
";

/// Small maze with a single entrance to its centre.
pub const MAZE: &str = "
    .......
    .#####.
    .#...#.
    .#.#.#.
    ...#...
";

/// Default policy with the expansion trace switched on.
#[must_use]
pub fn traced() -> SearchPolicyV1 {
    SearchPolicyV1 {
        record_trace: true,
        ..SearchPolicyV1::default()
    }
}

/// Parse an ASCII map into a shared grid.
///
/// # Panics
///
/// Panics if the text is not a valid map.
#[must_use]
pub fn grid(text: &str) -> Arc<GridMap> {
    Arc::new(GridMap::parse(text).unwrap())
}

/// A `width x height` map with each cell walled with probability
/// `density`. The top-left and bottom-right corners are always open.
///
/// # Panics
///
/// Panics on zero dimensions.
pub fn random_walls<R: Rng + ?Sized>(
    rng: &mut R,
    width: usize,
    height: usize,
    density: f64,
) -> GridMap {
    let mut map = GridMap::new(width, height).unwrap();
    for y in 0..height {
        for x in 0..width {
            if rng.random_bool(density) {
                map.set_wall((x, y), true).unwrap();
            }
        }
    }
    map.set_wall((0, 0), false).unwrap();
    map.set_wall((width - 1, height - 1), false).unwrap();
    map
}

/// Engine over `map` from `from` to `to`.
///
/// # Panics
///
/// Panics if either position is outside the map.
#[must_use]
pub fn grid_engine(
    map: &Arc<GridMap>,
    from: Position,
    to: Position,
    policy: SearchPolicyV1,
) -> AStar<GridCell> {
    let start = map.cell(from.0, from.1).unwrap();
    let goal = map.cell(to.0, to.1).unwrap();
    AStar::with_policy(start, goal, policy).unwrap()
}

/// Cell positions along the engine's current path.
#[must_use]
pub fn positions(engine: &AStar<GridCell>) -> Vec<Position> {
    engine.path().iter().map(|cell| cell.position()).collect()
}

/// Assert the path runs from `start` to the goal, every hop is one of its
/// predecessor's children, and the engine's parent links agree.
///
/// # Panics
///
/// Panics if the path is not valid.
pub fn assert_path_valid<N: SearchNode>(engine: &AStar<N>, start: &N::Key) {
    let path = engine.path();
    assert_eq!(&path[0].state_key(), start, "path must begin at start");
    let ids = engine.path_ids();
    assert_eq!(engine.parent_of(ids[0]), None, "start has no parent");
    for link in ids.windows(2) {
        assert_eq!(engine.parent_of(link[1]), Some(link[0]));
    }
    let last = path[path.len() - 1];
    assert!(last.is_goal(engine.goal()), "path must end at the goal");
    for pair in path.windows(2) {
        let next = pair[1].state_key();
        let children = pair[0].children().unwrap();
        assert!(
            children.into_iter().any(|c| c.state_key() == next),
            "{:?} is not a child of {:?}",
            next,
            pair[0].state_key()
        );
    }
}

/// Assert no state appears in closed twice.
///
/// # Panics
///
/// Panics on a duplicate expansion.
pub fn assert_no_duplicate_expansion<N: SearchNode>(engine: &AStar<N>) {
    let mut seen = HashSet::new();
    for node in engine.closed_list().iter() {
        let key = node.state_key();
        assert!(seen.insert(key.clone()), "{key:?} expanded twice");
    }
}

/// Assert the step counter equals one per expansion, plus one for the
/// step that found open empty.
///
/// # Panics
///
/// Panics if the counts disagree.
pub fn assert_step_accounting<N: SearchNode>(engine: &AStar<N>) {
    let expansions = u64::try_from(engine.closed_list().len()).unwrap();
    let expected = match engine.state() {
        SearchState::Failed => expansions + 1,
        _ => expansions,
    };
    assert_eq!(engine.step_count(), expected);
}

/// Unit-cost shortest distance by breadth-first search over `children`.
///
/// # Panics
///
/// Panics if `children` fails.
#[must_use]
pub fn bfs_distance<N: SearchNode>(start: N, goal: &N) -> Option<usize> {
    let target = goal.state_key();
    if start.state_key() == target {
        return Some(0);
    }
    let mut seen = HashSet::from([start.state_key()]);
    let mut queue = VecDeque::from([(start, 0usize)]);
    while let Some((node, d)) = queue.pop_front() {
        for child in node.children().unwrap() {
            let key = child.state_key();
            if key == target {
                return Some(d + 1);
            }
            if seen.insert(key) {
                queue.push_back((child, d + 1));
            }
        }
    }
    None
}
