//! # Runner
//!
//! A runner claims a slot in a published session, copies the maze into private
//! memory and walks it one cell at a time, publishing each new position.

pub mod outcome;
pub mod traversal;

pub use outcome::RunOutcome;
pub use traversal::{Step, Traversal, TraversalState, TraversalStats};

use crate::config::MazeConfig;
use crate::error::MazeResult;
use crate::maze::Position;
use crate::session::SharedSession;
use std::time::Duration;

/// Publication counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunnerStats {
    pub published: u64,
    pub publish_failures: u64,
}

/// One maze runner bound to a session slot
#[derive(Debug)]
pub struct MazeRunner {
    session: SharedSession,
    slot: usize,
    traversal: Traversal,
    step_delay: Duration,
    stats: RunnerStats,
}

impl MazeRunner {
    /// Attach to the configured session and claim a slot
    pub fn attach(config: &MazeConfig) -> MazeResult<Self> {
        let session = SharedSession::attach(config)?;
        Self::with_session(session, config.step_delay())
    }

    /// Claim a slot in an already attached session
    pub fn with_session(session: SharedSession, step_delay: Duration) -> MazeResult<Self> {
        let slot = session.register()?;
        let maze = session.geometry()?;
        let start = session.start_position(slot)?;
        let traversal = Traversal::new(maze, start)?;

        log::debug!(
            "Runner slot {} starting at {} in session '{}'",
            slot,
            start,
            session.name()
        );

        Ok(Self {
            session,
            slot,
            traversal,
            step_delay,
            stats: RunnerStats::default(),
        })
    }

    pub fn slot(&self) -> usize {
        self.slot
    }

    pub fn position(&self) -> Position {
        self.traversal.position()
    }

    pub fn traversal(&self) -> &Traversal {
        &self.traversal
    }

    pub fn stats(&self) -> RunnerStats {
        self.stats
    }

    pub fn session(&self) -> &SharedSession {
        &self.session
    }

    /// Walk until the exit, a dead end, or the session quit flag.
    ///
    /// Position publication failures are logged and counted; they never end
    /// the run.
    pub fn run(&mut self) -> RunOutcome {
        if self.traversal.state() == TraversalState::Done {
            log::info!("Runner slot {} started on an exit", self.slot);
            return RunOutcome::Done;
        }

        self.pace();
        loop {
            if self.session.is_quit() {
                self.traversal.abort();
                log::info!(
                    "Runner slot {} stopping at {}: quit requested",
                    self.slot,
                    self.position()
                );
                return RunOutcome::Aborted;
            }

            match self.traversal.step() {
                Step::Moved { to, arrived } => {
                    self.publish(to);
                    if arrived {
                        let stats = self.traversal.stats();
                        log::info!(
                            "Runner slot {} reached exit {} after {} step(s)",
                            self.slot,
                            to,
                            stats.steps
                        );
                        return RunOutcome::Done;
                    }
                }
                Step::Blocked => {
                    log::info!(
                        "Runner slot {} is blocked at {}",
                        self.slot,
                        self.position()
                    );
                    return RunOutcome::Blocked;
                }
                Step::Halted(state) => return Self::outcome_for(state),
            }

            self.pace();
        }
    }

    fn publish(&mut self, pos: Position) {
        match self.session.publish(self.slot, pos) {
            Ok(()) => {
                self.stats.published += 1;
                log::trace!("Runner slot {} at {}", self.slot, pos);
            }
            Err(e) => {
                self.stats.publish_failures += 1;
                log::warn!("Runner slot {} failed to publish {}: {}", self.slot, pos, e);
            }
        }
    }

    fn pace(&self) {
        if !self.step_delay.is_zero() {
            std::thread::sleep(self.step_delay);
        }
    }

    fn outcome_for(state: TraversalState) -> RunOutcome {
        match state {
            TraversalState::Done => RunOutcome::Done,
            TraversalState::Blocked => RunOutcome::Blocked,
            TraversalState::Exploring | TraversalState::Aborted => RunOutcome::Aborted,
        }
    }
}
