//! Maze model: grid geometry, text loading and start placement

pub mod geometry;
pub mod loader;
pub mod placement;

pub use geometry::{Cell, Direction, MazeGeometry, Position};
pub use loader::{load_maze, parse_maze};
pub use placement::{random_starts, seeded_starts};
