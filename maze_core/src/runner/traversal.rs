//! Memory-marking depth-first traversal.
//!
//! Each runner explores its own copy of the maze. Cells that look like dead
//! ends (three or more blocked sides) are marked visited so later passes avoid
//! them; a cell that is fully boxed in by walls and marks clears the marks
//! around it and tries again. Neighbours are always considered in the order
//! right, down, left, up.
//!
//! The heuristic is not complete: on some layouts without a reachable exit it
//! keeps marking and unmarking forever, and only the session quit flag stops
//! the runner.

use crate::error::{MazeError, MazeResult};
use crate::maze::{Cell, Direction, MazeGeometry, Position};
use std::fmt;

/// Traversal lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraversalState {
    Exploring,
    Blocked,
    Done,
    Aborted,
}

impl fmt::Display for TraversalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraversalState::Exploring => write!(f, "Exploring"),
            TraversalState::Blocked => write!(f, "Blocked"),
            TraversalState::Done => write!(f, "Done"),
            TraversalState::Aborted => write!(f, "Aborted"),
        }
    }
}

/// Result of a single traversal step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Moved one cell; `arrived` is set when the new cell is an exit
    Moved { to: Position, arrived: bool },
    /// No open neighbour remains, traversal is over
    Blocked,
    /// Traversal had already finished in the given state
    Halted(TraversalState),
}

/// Counters kept across steps
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraversalStats {
    /// Moves made
    pub steps: u64,
    /// Cells newly marked visited
    pub marks: u64,
    /// Dead-end recoveries that cleared at least one neighbouring mark
    pub unmarks: u64,
}

/// Per-runner traversal over a private maze copy
#[derive(Debug, Clone)]
pub struct Traversal {
    maze: MazeGeometry,
    position: Position,
    // Where the previous step started, i.e. two positions back after a move
    last_origin: Position,
    state: TraversalState,
    stats: TraversalStats,
}

impl Traversal {
    /// Start exploring from `start`, which must be an open cell
    pub fn new(maze: MazeGeometry, start: Position) -> MazeResult<Self> {
        let state = match maze.get(start) {
            Some(Cell::Exit) => TraversalState::Done,
            Some(cell) if !cell.is_blocking() => TraversalState::Exploring,
            _ => {
                return Err(MazeError::InvalidStart {
                    col: start.col,
                    row: start.row,
                })
            }
        };

        Ok(Self {
            maze,
            position: start,
            last_origin: start,
            state,
            stats: TraversalStats::default(),
        })
    }

    pub fn state(&self) -> TraversalState {
        self.state
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn stats(&self) -> TraversalStats {
        self.stats
    }

    /// The local maze copy, including visited marks
    pub fn maze(&self) -> &MazeGeometry {
        &self.maze
    }

    pub fn is_finished(&self) -> bool {
        self.state != TraversalState::Exploring
    }

    /// Stop exploring; has no effect once finished
    pub fn abort(&mut self) {
        if self.state == TraversalState::Exploring {
            self.state = TraversalState::Aborted;
        }
    }

    /// Advance by one cell
    pub fn step(&mut self) -> Step {
        if self.state != TraversalState::Exploring {
            return Step::Halted(self.state);
        }

        let here = self.position;
        let two_back = std::mem::replace(&mut self.last_origin, here);

        let blocked_sides = self.blocked_sides(here);
        if blocked_sides == 4 {
            if !self.unmark_neighbours(here) {
                self.state = TraversalState::Blocked;
                return Step::Blocked;
            }
            self.stats.unmarks += 1;
        }

        if blocked_sides >= 3 && self.maze.mark_visited(here) {
            self.stats.marks += 1;
        }

        let Some(next) = self.next_move(here) else {
            self.state = TraversalState::Blocked;
            return Step::Blocked;
        };

        self.position = next;
        self.stats.steps += 1;

        if self.maze.get(next) == Some(Cell::Exit) {
            self.state = TraversalState::Done;
            return Step::Moved {
                to: next,
                arrived: true,
            };
        }

        // Back where we were two steps ago: break the ping-pong
        if next == two_back && self.maze.mark_visited(next) {
            self.stats.marks += 1;
        }

        Step::Moved {
            to: next,
            arrived: false,
        }
    }

    fn blocked_sides(&self, pos: Position) -> usize {
        Direction::PRIORITY
            .iter()
            .filter(|&&dir| self.maze.is_blocked(pos.step(dir)))
            .count()
    }

    fn unmark_neighbours(&mut self, pos: Position) -> bool {
        let mut cleared = false;
        for dir in Direction::PRIORITY {
            cleared |= self.maze.unmark(pos.step(dir));
        }
        cleared
    }

    fn next_move(&self, pos: Position) -> Option<Position> {
        Direction::PRIORITY
            .iter()
            .map(|&dir| pos.step(dir))
            .find(|&next| !self.maze.is_blocked(next))
    }
}
