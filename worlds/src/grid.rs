//! `GridCell`: 2-D grid world with walls.
//!
//! Moves are 4-directional (north, east, south, west), each costing 1. The
//! heuristic is the Manhattan distance to the goal cell. `y = 0` is the top
//! row; north decreases `y`.
//!
//! Membership uses the engine's hashed index keyed by position.

use std::collections::VecDeque;
use std::convert::Infallible;
use std::fmt;
use std::sync::Arc;

use astral_search::{Cost, SearchNode};

use crate::error::WorldError;

/// `(x, y)` cell coordinate.
pub type Position = (usize, usize);

/// Cost of one move between adjacent cells.
const STEP_COST: Cost = 1;

/// A rectangular map of open cells and walls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridMap {
    width: usize,
    height: usize,
    walls: Vec<bool>,
}

impl GridMap {
    /// An open map with no walls.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidShape`] if either dimension is zero.
    pub fn new(width: usize, height: usize) -> Result<Self, WorldError> {
        if width == 0 || height == 0 {
            return Err(WorldError::InvalidShape {
                detail: format!("grid must be at least 1x1, got {width}x{height}"),
            });
        }
        Ok(Self {
            width,
            height,
            walls: vec![false; width * height],
        })
    }

    /// Parse a map from text: `#` is a wall, `.` is open. One row per line;
    /// blank lines and surrounding whitespace are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::Parse`] for unknown characters or ragged rows,
    /// and [`WorldError::InvalidShape`] for an empty map.
    pub fn parse(text: &str) -> Result<Self, WorldError> {
        let mut width = None;
        let mut walls = Vec::new();
        let mut height = 0;

        for (line_no, line) in text.lines().enumerate() {
            let row = line.trim();
            if row.is_empty() {
                continue;
            }
            let row_width = row.chars().count();
            match width {
                None => width = Some(row_width),
                Some(w) if w != row_width => {
                    return Err(WorldError::Parse {
                        line: line_no + 1,
                        detail: format!("row has {row_width} cells, expected {w}"),
                    });
                }
                Some(_) => {}
            }
            for ch in row.chars() {
                match ch {
                    '#' => walls.push(true),
                    '.' => walls.push(false),
                    other => {
                        return Err(WorldError::Parse {
                            line: line_no + 1,
                            detail: format!("unexpected character {other:?}"),
                        });
                    }
                }
            }
            height += 1;
        }

        let Some(width) = width else {
            return Err(WorldError::InvalidShape {
                detail: "map text has no rows".into(),
            });
        };
        Ok(Self {
            width,
            height,
            walls,
        })
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    fn index(&self, (x, y): Position) -> Result<usize, WorldError> {
        if x < self.width && y < self.height {
            Ok(y * self.width + x)
        } else {
            Err(WorldError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            })
        }
    }

    /// Mark or clear a wall.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::OutOfBounds`] for positions outside the map.
    pub fn set_wall(&mut self, pos: Position, wall: bool) -> Result<(), WorldError> {
        let i = self.index(pos)?;
        self.walls[i] = wall;
        Ok(())
    }

    /// Builder form of [`GridMap::set_wall`].
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::OutOfBounds`] for positions outside the map.
    pub fn with_wall(mut self, pos: Position) -> Result<Self, WorldError> {
        self.set_wall(pos, true)?;
        Ok(self)
    }

    /// Whether `pos` is a wall. Out-of-bounds positions count as walls.
    #[must_use]
    pub fn is_wall(&self, pos: Position) -> bool {
        self.index(pos).map_or(true, |i| self.walls[i])
    }

    /// Open neighbours of `pos` in north, east, south, west order.
    #[must_use]
    pub fn neighbours(&self, (x, y): Position) -> Vec<Position> {
        let candidates = [
            y.checked_sub(1).map(|ny| (x, ny)),
            Some((x + 1, y)),
            Some((x, y + 1)),
            x.checked_sub(1).map(|nx| (nx, y)),
        ];
        candidates
            .into_iter()
            .flatten()
            .filter(|&p| !self.is_wall(p))
            .collect()
    }

    /// A search node at `pos`.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::OutOfBounds`] for positions outside the map.
    pub fn cell(self: &Arc<Self>, x: usize, y: usize) -> Result<GridCell, WorldError> {
        self.index((x, y))?;
        Ok(GridCell {
            map: Arc::clone(self),
            pos: (x, y),
            g: 0,
            h: 0,
        })
    }

    /// Breadth-first distance in moves from `from` to `to`.
    ///
    /// Brute-force reference for checking search results.
    #[must_use]
    pub fn bfs_distance(&self, from: Position, to: Position) -> Option<usize> {
        self.bfs(from).get(self.index(to).ok()?).copied().flatten()
    }

    /// Number of cells reachable from `from`, including `from` itself.
    #[must_use]
    pub fn reachable_count(&self, from: Position) -> usize {
        self.bfs(from).iter().filter(|d| d.is_some()).count()
    }

    fn bfs(&self, from: Position) -> Vec<Option<usize>> {
        let mut dist = vec![None; self.walls.len()];
        let Ok(start) = self.index(from) else {
            return dist;
        };
        dist[start] = Some(0);
        let mut queue = VecDeque::from([(from, 0usize)]);
        while let Some((pos, d)) = queue.pop_front() {
            for next in self.neighbours(pos) {
                let i = next.1 * self.width + next.0;
                if dist[i].is_none() {
                    dist[i] = Some(d + 1);
                    queue.push_back((next, d + 1));
                }
            }
        }
        dist
    }

    /// Render the map with `path` overlaid.
    ///
    /// `#` wall, `.` open, `*` path cell, `S`/`G` first/last path cell.
    #[must_use]
    pub fn render(&self, path: &[Position]) -> String {
        let mut out = String::with_capacity((self.width + 1) * self.height);
        for y in 0..self.height {
            for x in 0..self.width {
                let ch = if path.first() == Some(&(x, y)) {
                    'S'
                } else if path.last() == Some(&(x, y)) {
                    'G'
                } else if path.contains(&(x, y)) {
                    '*'
                } else if self.walls[y * self.width + x] {
                    '#'
                } else {
                    '.'
                };
                out.push(ch);
            }
            out.push('\n');
        }
        out
    }
}

impl fmt::Display for GridMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(&[]))
    }
}

/// A cell of a [`GridMap`] as a search node.
#[derive(Debug, Clone)]
pub struct GridCell {
    map: Arc<GridMap>,
    pos: Position,
    g: Cost,
    h: Cost,
}

impl GridCell {
    #[must_use]
    pub fn position(&self) -> Position {
        self.pos
    }

    #[must_use]
    pub fn map(&self) -> &Arc<GridMap> {
        &self.map
    }
}

fn manhattan(a: Position, b: Position) -> Cost {
    let d = a.0.abs_diff(b.0) + a.1.abs_diff(b.1);
    Cost::try_from(d).unwrap_or(Cost::MAX)
}

impl SearchNode for GridCell {
    type Key = Position;
    type Children = Vec<GridCell>;
    type Error = Infallible;

    fn state_key(&self) -> Position {
        self.pos
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
        self.h = manhattan(self.pos, goal.pos);
    }

    fn children(&self) -> Result<Vec<GridCell>, Infallible> {
        Ok(self
            .map
            .neighbours(self.pos)
            .into_iter()
            .map(|pos| GridCell {
                map: Arc::clone(&self.map),
                pos,
                g: 0,
                h: 0,
            })
            .collect())
    }

    fn compatible_with(&self, other: &Self) -> bool {
        self.map.width == other.map.width && self.map.height == other.map.height
    }
}
