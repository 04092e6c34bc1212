//! # Maze Core
//!
//! Shared-memory runtime for independent maze runners.
//!
//! One coordinator publishes a maze and a pool of start positions into a named
//! shared-memory session. Any number of runner processes attach to that session,
//! claim a unique slot under the session lock, and explore the maze with a
//! memory-marking depth-first search, publishing their position after every step.
//!
//! - **Memory**: mapped session region, layout and the process-shared lock word
//! - **Maze**: grid geometry, text loader and random start placement
//! - **Session**: registration, position publication, snapshots and the quit flag
//! - **Runner**: the per-step traversal state machine and the runner loop
//! - **Coordinator**: session publication and teardown
//!
//! ## Quick Start
//!
//! ```no_run
//! use maze_core::{Coordinator, MazeConfig, MazeGeometry, MazeRunner, Position};
//!
//! # fn main() -> maze_core::MazeResult<()> {
//! let config = MazeConfig::default();
//! let maze = MazeGeometry::from_rows(&["#####", "#   #", "# # #", "#  E#", "#####"])?;
//! let mut coordinator = Coordinator::publish(&config, &maze, &[Position::new(1, 1)])?;
//!
//! let mut runner = MazeRunner::attach(&config)?;
//! let outcome = runner.run();
//! println!("runner {} finished: {}", runner.slot(), outcome);
//!
//! coordinator.shutdown()?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod coordinator;
pub mod error;
pub mod maze;
pub mod memory;
pub mod runner;
pub mod session;

pub use config::MazeConfig;
pub use coordinator::Coordinator;
pub use error::{MazeError, MazeResult};
pub use maze::{Cell, Direction, MazeGeometry, Position};
pub use runner::{
    MazeRunner, RunOutcome, RunnerStats, Step, Traversal, TraversalState, TraversalStats,
};
pub use session::{RegistrySnapshot, SharedSession};
