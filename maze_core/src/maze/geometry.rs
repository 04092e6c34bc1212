use crate::error::{MazeError, MazeResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Grid coordinate, column first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub col: i32,
    pub row: i32,
}

impl Position {
    pub const fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    /// Neighbouring position one cell in `direction`
    pub fn step(self, direction: Direction) -> Self {
        let (dc, dr) = direction.delta();
        Self::new(self.col + dc, self.row + dr)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.col, self.row)
    }
}

/// Orthogonal move directions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Right,
    Down,
    Left,
    Up,
}

impl Direction {
    /// Fixed order in which runners inspect and choose neighbours
    pub const PRIORITY: [Direction; 4] = [
        Direction::Right,
        Direction::Down,
        Direction::Left,
        Direction::Up,
    ];

    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::Right => (1, 0),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Up => (0, -1),
        }
    }
}

/// Cell tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    /// Open floor, eligible for start placement
    Empty,
    Wall,
    Exit,
    /// Runner-local dead-end annotation, never published
    Visited,
    /// Any other character from the source file, traversable
    Marker(u8),
}

impl Cell {
    pub const EMPTY_CHAR: u8 = b' ';
    pub const WALL_CHAR: u8 = b'#';
    pub const WALL_ALT_CHAR: u8 = b'X';
    pub const EXIT_CHAR: u8 = b'E';
    pub const VISITED_CHAR: u8 = b'x';

    /// Decode a published byte. Never yields `Visited`.
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            Self::EMPTY_CHAR => Cell::Empty,
            Self::WALL_CHAR | Self::WALL_ALT_CHAR => Cell::Wall,
            Self::EXIT_CHAR => Cell::Exit,
            other => Cell::Marker(other),
        }
    }

    pub fn to_byte(self) -> u8 {
        match self {
            Cell::Empty => Self::EMPTY_CHAR,
            Cell::Wall => Self::WALL_CHAR,
            Cell::Exit => Self::EXIT_CHAR,
            Cell::Visited => Self::VISITED_CHAR,
            Cell::Marker(byte) => byte,
        }
    }

    /// Walls and local marks block movement
    pub fn is_blocking(self) -> bool {
        matches!(self, Cell::Wall | Cell::Visited)
    }
}

/// Rectangular maze grid addressed by (column, row).
///
/// Cells are stored column-major so a column's cells are contiguous, the same
/// order used for the published byte grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MazeGeometry {
    cols: usize,
    rows: usize,
    cells: Vec<Cell>,
}

impl MazeGeometry {
    /// Create an all-empty grid
    pub fn new(cols: usize, rows: usize) -> Self {
        Self {
            cols,
            rows,
            cells: vec![Cell::Empty; cols * rows],
        }
    }

    /// Build a grid from text rows; the widest row sets the width and
    /// shorter rows are padded with empty cells
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> MazeResult<Self> {
        let cols = rows.iter().map(|r| r.as_ref().len()).max().unwrap_or(0);
        if rows.is_empty() || cols == 0 {
            return Err(MazeError::InvalidMaze("maze has no cells".to_string()));
        }

        let mut maze = Self::new(cols, rows.len());
        for (row, line) in rows.iter().enumerate() {
            for (col, byte) in line.as_ref().bytes().enumerate() {
                let idx = maze.index(col, row);
                maze.cells[idx] = Cell::from_byte(byte);
            }
        }
        Ok(maze)
    }

    /// Decode a column-major byte grid
    pub fn from_bytes(cols: usize, rows: usize, bytes: &[u8]) -> MazeResult<Self> {
        if bytes.len() != cols * rows {
            return Err(MazeError::InvalidMaze(format!(
                "expected {} cells for a {}x{} maze, got {}",
                cols * rows,
                cols,
                rows,
                bytes.len()
            )));
        }
        Ok(Self {
            cols,
            rows,
            cells: bytes.iter().map(|&b| Cell::from_byte(b)).collect(),
        })
    }

    /// Encode into a column-major byte grid of `cols * rows` bytes
    pub fn write_bytes(&self, out: &mut [u8]) {
        for (slot, cell) in out.iter_mut().zip(&self.cells) {
            *slot = cell.to_byte();
        }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    fn index(&self, col: usize, row: usize) -> usize {
        col * self.rows + row
    }

    fn checked_index(&self, pos: Position) -> Option<usize> {
        self.in_bounds(pos)
            .then(|| self.index(pos.col as usize, pos.row as usize))
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.col >= 0
            && pos.row >= 0
            && (pos.col as usize) < self.cols
            && (pos.row as usize) < self.rows
    }

    pub fn get(&self, pos: Position) -> Option<Cell> {
        self.checked_index(pos).map(|idx| self.cells[idx])
    }

    /// Overwrite a cell, returns false when out of bounds
    pub fn set(&mut self, pos: Position, cell: Cell) -> bool {
        match self.checked_index(pos) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Out of bounds, wall, or locally marked
    pub fn is_blocked(&self, pos: Position) -> bool {
        self.get(pos).is_none_or(Cell::is_blocking)
    }

    /// Mark a cell as visited; walls and exits are left untouched
    pub fn mark_visited(&mut self, pos: Position) -> bool {
        match self.checked_index(pos) {
            Some(idx) if matches!(self.cells[idx], Cell::Empty | Cell::Marker(_)) => {
                self.cells[idx] = Cell::Visited;
                true
            }
            _ => false,
        }
    }

    /// Clear a visited mark back to empty; any other cell is left untouched
    pub fn unmark(&mut self, pos: Position) -> bool {
        match self.checked_index(pos) {
            Some(idx) if self.cells[idx] == Cell::Visited => {
                self.cells[idx] = Cell::Empty;
                true
            }
            _ => false,
        }
    }

    fn positions_where(&self, pred: impl Fn(Cell) -> bool) -> Vec<Position> {
        let mut found = Vec::new();
        for row in 0..self.rows {
            for col in 0..self.cols {
                if pred(self.cells[self.index(col, row)]) {
                    found.push(Position::new(col as i32, row as i32));
                }
            }
        }
        found
    }

    /// Exit cells in row-major order
    pub fn exits(&self) -> Vec<Position> {
        self.positions_where(|c| c == Cell::Exit)
    }

    /// Empty cells in row-major order
    pub fn empty_cells(&self) -> Vec<Position> {
        self.positions_where(|c| c == Cell::Empty)
    }

    pub fn visited_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c == Cell::Visited).count()
    }

    /// Text rendering, one line per row
    pub fn render(&self) -> String {
        let mut out = String::with_capacity((self.cols + 1) * self.rows);
        for row in 0..self.rows {
            for col in 0..self.cols {
                out.push(self.cells[self.index(col, row)].to_byte() as char);
            }
            if row + 1 < self.rows {
                out.push('\n');
            }
        }
        out
    }
}
