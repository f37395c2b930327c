//! `TilePuzzle`: the sliding-tile puzzle (8-puzzle, 15-puzzle, ...).
//!
//! Tiles are stored row-major; `0` is the blank. A move slides a tile into
//! the blank, which is the same as moving the blank north, east, south or
//! west. Every move costs 1.
//!
//! Two heuristics are available. [`PuzzleHeuristic::Manhattan`] is
//! admissible. [`PuzzleHeuristic::NilssonSequence`] adds three times
//! Nilsson's sequence score, which finds solutions faster on larger boards
//! but may overestimate.

use std::fmt;

use astral_search::{Cost, SearchNode};
use log::debug;
use rand::seq::IndexedRandom;
use rand::Rng;

use crate::error::WorldError;

/// The blank tile.
pub const BLANK: u8 = 0;

/// Cost of one slide.
const STEP_COST: Cost = 1;

/// Weight of the sequence score in [`PuzzleHeuristic::NilssonSequence`].
const SEQUENCE_WEIGHT: Cost = 3;

const MIN_SIDE: usize = 2;
const MAX_SIDE: usize = 16;

/// Heuristic used by [`TilePuzzle::set_estimated_cost`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PuzzleHeuristic {
    /// Sum of tile distances to their goal cells.
    #[default]
    Manhattan,
    /// Manhattan plus `3 *` Nilsson's sequence score.
    NilssonSequence,
}

/// One board configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TilePuzzle {
    side: usize,
    tiles: Box<[u8]>,
    heuristic: PuzzleHeuristic,
    g: Cost,
    h: Cost,
}

impl TilePuzzle {
    /// Build a board of `side * side` tiles.
    ///
    /// Tiles must be distinct and no larger than `side * side`. A board
    /// without a blank is accepted here; it fails when asked for children.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidShape`] for a bad side or tile count or
    /// an out-of-range tile, and [`WorldError::DuplicateTile`] for repeats.
    pub fn new(side: usize, tiles: impl Into<Box<[u8]>>) -> Result<Self, WorldError> {
        let tiles = tiles.into();
        if !(MIN_SIDE..=MAX_SIDE).contains(&side) {
            return Err(WorldError::InvalidShape {
                detail: format!("side must be in {MIN_SIDE}..={MAX_SIDE}, got {side}"),
            });
        }
        let cells = side * side;
        if tiles.len() != cells {
            return Err(WorldError::InvalidShape {
                detail: format!("expected {cells} tiles, got {}", tiles.len()),
            });
        }
        let mut seen = vec![false; cells + 1];
        for &tile in tiles.iter() {
            let t = usize::from(tile);
            if t > cells {
                return Err(WorldError::InvalidShape {
                    detail: format!("tile {tile} exceeds {cells}"),
                });
            }
            if seen[t] {
                return Err(WorldError::DuplicateTile { tile });
            }
            seen[t] = true;
        }
        Ok(Self {
            side,
            tiles,
            heuristic: PuzzleHeuristic::default(),
            g: 0,
            h: 0,
        })
    }

    /// The solved board: `1, 2, ..., side*side - 1` with the blank last.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidShape`] for a side outside `2..=16`.
    pub fn goal(side: usize) -> Result<Self, WorldError> {
        if !(MIN_SIDE..=MAX_SIDE).contains(&side) {
            return Err(WorldError::InvalidShape {
                detail: format!("side must be in {MIN_SIDE}..={MAX_SIDE}, got {side}"),
            });
        }
        let cells = side * side;
        let mut tiles = Vec::with_capacity(cells);
        for i in 1..cells {
            let tile = u8::try_from(i).map_err(|_| WorldError::InvalidShape {
                detail: format!("tile {i} does not fit in a byte"),
            })?;
            tiles.push(tile);
        }
        tiles.push(BLANK);
        Self::new(side, tiles)
    }

    /// Use `heuristic` for this board and every board generated from it.
    #[must_use]
    pub fn with_heuristic(mut self, heuristic: PuzzleHeuristic) -> Self {
        self.heuristic = heuristic;
        self
    }

    #[must_use]
    pub fn side(&self) -> usize {
        self.side
    }

    #[must_use]
    pub fn tiles(&self) -> &[u8] {
        &self.tiles
    }

    #[must_use]
    pub fn heuristic(&self) -> PuzzleHeuristic {
        self.heuristic
    }

    /// Index of the blank, if the board has one.
    #[must_use]
    pub fn blank_index(&self) -> Option<usize> {
        self.tiles.iter().position(|&t| t == BLANK)
    }

    /// Cells the blank can move to, in north, east, south, west order.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::MissingBlank`] if the board has no blank.
    pub fn moves(&self) -> Result<Vec<usize>, WorldError> {
        let blank = self.blank_index().ok_or(WorldError::MissingBlank)?;
        let (row, col) = (blank / self.side, blank % self.side);
        let mut out = Vec::with_capacity(4);
        if row > 0 {
            out.push(blank - self.side);
        }
        if col + 1 < self.side {
            out.push(blank + 1);
        }
        if row + 1 < self.side {
            out.push(blank + self.side);
        }
        if col > 0 {
            out.push(blank - 1);
        }
        Ok(out)
    }

    fn slide(&self, blank: usize, to: usize) -> Self {
        let mut tiles = self.tiles.clone();
        tiles.swap(blank, to);
        Self {
            side: self.side,
            tiles,
            heuristic: self.heuristic,
            g: 0,
            h: 0,
        }
    }

    /// A board `moves` random slides away from this one.
    ///
    /// The walk never immediately undoes its previous slide. The result is
    /// always solvable back to `self`.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::MissingBlank`] if the board has no blank.
    pub fn shuffled<R: Rng + ?Sized>(&self, moves: usize, rng: &mut R) -> Result<Self, WorldError> {
        let mut board = self.clone();
        let mut previous = None;
        for _ in 0..moves {
            let blank = board.blank_index().ok_or(WorldError::MissingBlank)?;
            let candidates: Vec<usize> = board
                .moves()?
                .into_iter()
                .filter(|&to| Some(to) != previous)
                .collect();
            let Some(&to) = candidates.choose(rng) else {
                break;
            };
            board = board.slide(blank, to);
            previous = Some(blank);
        }
        board.g = 0;
        board.h = 0;
        debug!("shuffled {0}x{0} board with {moves} slides", self.side);
        Ok(board)
    }

    /// Whether `goal` can be reached from this board by sliding.
    ///
    /// Boards must share a side, a tile set and a blank. Reachability then
    /// holds exactly when the permutation parity matches the parity of the
    /// blank's Manhattan displacement.
    #[must_use]
    pub fn is_solvable_towards(&self, goal: &Self) -> bool {
        if !self.compatible_with(goal) {
            return false;
        }
        let (Some(blank), Some(goal_blank)) = (self.blank_index(), goal.blank_index()) else {
            return false;
        };
        let goal_pos = goal.positions();
        let perm: Vec<usize> = self
            .tiles
            .iter()
            .map(|&t| goal_pos[usize::from(t)])
            .collect();

        let mut visited = vec![false; perm.len()];
        let mut cycles = 0;
        for start in 0..perm.len() {
            if visited[start] {
                continue;
            }
            cycles += 1;
            let mut i = start;
            while !visited[i] {
                visited[i] = true;
                i = perm[i];
            }
        }
        let perm_odd = (perm.len() - cycles) % 2 == 1;
        let blank_odd = self.distance(blank, goal_blank) % 2 == 1;
        perm_odd == blank_odd
    }

    /// `positions()[tile]` is the index holding `tile`.
    fn positions(&self) -> Vec<usize> {
        let mut pos = vec![usize::MAX; self.tiles.len() + 1];
        for (i, &t) in self.tiles.iter().enumerate() {
            pos[usize::from(t)] = i;
        }
        pos
    }

    fn distance(&self, a: usize, b: usize) -> usize {
        (a / self.side).abs_diff(b / self.side) + (a % self.side).abs_diff(b % self.side)
    }

    fn manhattan_to(&self, goal_pos: &[usize]) -> usize {
        self.tiles
            .iter()
            .enumerate()
            .filter(|&(_, &t)| t != BLANK)
            .map(|(i, &t)| self.distance(i, goal_pos[usize::from(t)]))
            .sum()
    }

    /// Nilsson's sequence score against `goal`.
    ///
    /// Walking the outer ring clockwise, each tile whose clockwise neighbour
    /// differs from its neighbour in the goal scores 2. Each misplaced tile
    /// off the ring scores 1.
    fn sequence_score(&self, goal: &Self, goal_pos: &[usize]) -> usize {
        let ring = perimeter(self.side);
        let mut next_on_ring = vec![None; self.tiles.len()];
        for (k, &cell) in ring.iter().enumerate() {
            next_on_ring[cell] = Some(ring[(k + 1) % ring.len()]);
        }

        let mut score = 0;
        for (cell, &tile) in self.tiles.iter().enumerate() {
            if tile == BLANK {
                continue;
            }
            match next_on_ring[cell] {
                Some(next) => {
                    let expected = next_on_ring[goal_pos[usize::from(tile)]]
                        .map(|goal_next| goal.tiles[goal_next]);
                    if expected != Some(self.tiles[next]) {
                        score += 2;
                    }
                }
                None => {
                    if goal.tiles[cell] != tile {
                        score += 1;
                    }
                }
            }
        }
        score
    }
}

/// Outer ring cell indices of a `side * side` board, clockwise from the top
/// left corner.
fn perimeter(side: usize) -> Vec<usize> {
    let last = side - 1;
    let mut ring = Vec::with_capacity(4 * last);
    ring.extend(0..side);
    ring.extend((1..side).map(|row| row * side + last));
    ring.extend((0..last).rev().map(|col| last * side + col));
    ring.extend((1..last).rev().map(|row| row * side));
    ring
}

fn to_cost(n: usize) -> Cost {
    Cost::try_from(n).unwrap_or(Cost::MAX)
}

impl SearchNode for TilePuzzle {
    type Key = Box<[u8]>;
    type Children = Vec<TilePuzzle>;
    type Error = WorldError;

    fn state_key(&self) -> Box<[u8]> {
        self.tiles.clone()
    }

    fn movement_cost(&self) -> Cost {
        self.g
    }

    fn estimated_cost(&self) -> Cost {
        self.h
    }

    fn set_movement_cost(&mut self, parent: &Self) {
        self.g = parent.g.saturating_add(STEP_COST);
    }

    fn set_estimated_cost(&mut self, goal: &Self) {
        let goal_pos = goal.positions();
        let manhattan = to_cost(self.manhattan_to(&goal_pos));
        self.h = match self.heuristic {
            PuzzleHeuristic::Manhattan => manhattan,
            PuzzleHeuristic::NilssonSequence => {
                let sequence = to_cost(self.sequence_score(goal, &goal_pos));
                manhattan.saturating_add(SEQUENCE_WEIGHT.saturating_mul(sequence))
            }
        };
    }

    fn children(&self) -> Result<Vec<TilePuzzle>, WorldError> {
        let blank = self.blank_index().ok_or(WorldError::MissingBlank)?;
        Ok(self
            .moves()?
            .into_iter()
            .map(|to| self.slide(blank, to))
            .collect())
    }

    fn compatible_with(&self, other: &Self) -> bool {
        if self.side != other.side {
            return false;
        }
        let mut a = self.tiles.to_vec();
        let mut b = other.tiles.to_vec();
        a.sort_unstable();
        b.sort_unstable();
        a == b
    }
}

impl fmt::Display for TilePuzzle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = (self.tiles.len() - 1).to_string().len();
        for row in self.tiles.chunks(self.side) {
            for (i, &tile) in row.iter().enumerate() {
                if i > 0 {
                    f.write_str(" ")?;
                }
                if tile == BLANK {
                    write!(f, "{:>width$}", ".")?;
                } else {
                    write!(f, "{tile:>width$}")?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
