//! Session owner: publishes the maze, then retires the session on shutdown.

use crate::config::MazeConfig;
use crate::error::{MazeError, MazeResult};
use crate::maze::{load_maze, seeded_starts, MazeGeometry, Position};
use crate::session::{RegistrySnapshot, SharedSession};
use std::path::Path;
use std::time::Duration;

/// Owns a published session for its whole lifetime
#[derive(Debug)]
pub struct Coordinator {
    session: Option<SharedSession>,
    grace: Duration,
}

impl Coordinator {
    /// Publish `maze` with one runner slot per start position
    pub fn publish(
        config: &MazeConfig,
        maze: &MazeGeometry,
        starts: &[Position],
    ) -> MazeResult<Self> {
        let session = SharedSession::create(config, maze, starts)?;
        Ok(Self {
            session: Some(session),
            grace: config.shutdown_grace(),
        })
    }

    /// Load a maze file and publish it with `max_runners` random starts
    pub fn from_maze_file<P: AsRef<Path>>(config: &MazeConfig, path: P) -> MazeResult<Self> {
        let maze = load_maze(path)?;
        let starts = seeded_starts(&maze, config.max_runners, config.seed)?;
        Self::publish(config, &maze, &starts)
    }

    /// The live session, or `None` after shutdown
    pub fn session(&self) -> Option<&SharedSession> {
        self.session.as_ref()
    }

    pub fn snapshot(&self) -> MazeResult<RegistrySnapshot> {
        self.live()?.snapshot()
    }

    pub fn request_quit(&self) -> MazeResult<()> {
        self.live()?.request_quit();
        Ok(())
    }

    fn live(&self) -> MazeResult<&SharedSession> {
        self.session
            .as_ref()
            .ok_or_else(|| MazeError::Internal("coordinator already shut down".to_string()))
    }

    /// Retire the session.
    ///
    /// Raises quit, waits the grace period so runners can observe it, clears the
    /// validity tag and removes the backing file. Calling it again is a no-op.
    pub fn shutdown(&mut self) -> MazeResult<()> {
        let Some(session) = self.session.take() else {
            return Ok(());
        };

        session.request_quit();
        if !self.grace.is_zero() {
            std::thread::sleep(self.grace);
        }

        if let Ok(snapshot) = session.snapshot() {
            log::info!(
                "Retiring session '{}' with {} of {} slot(s) registered",
                session.name(),
                snapshot.registered(),
                snapshot.capacity()
            );
        }

        session.invalidate();
        session.unlink()
    }
}

impl Drop for Coordinator {
    fn drop(&mut self) {
        if let Err(e) = self.shutdown() {
            log::warn!("Failed to retire session: {}", e);
        }
    }
}
