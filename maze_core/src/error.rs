use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Result type used throughout maze_core
pub type MazeResult<T> = std::result::Result<T, MazeError>;

/// Errors raised by sessions, runners and the coordinator
#[derive(Debug, Error)]
pub enum MazeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid maze: {0}")]
    InvalidMaze(String),

    #[error("Maze has no empty cells to place runners on")]
    NoEmptyCells,

    #[error("Session '{name}' not found at {}", path.display())]
    SessionNotFound { name: String, path: PathBuf },

    #[error("Session '{name}' is not initialized: {reason}")]
    SessionInvalid { name: String, reason: String },

    #[error("Runner registry is full ({capacity} slots)")]
    RegistryFull { capacity: usize },

    #[error("Slot {slot} is out of range (capacity {capacity})")]
    SlotOutOfRange { slot: usize, capacity: usize },

    #[error("Start position ({col}, {row}) is not a traversable cell")]
    InvalidStart { col: i32, row: i32 },

    #[error("Timed out after {0:?} waiting for the session lock")]
    LockTimeout(Duration),

    #[error("{0}")]
    Internal(String),
}

impl MazeError {
    /// Shorthand for a configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        MazeError::Config(msg.into())
    }

    /// Fatal setup problems that a runner must not retry
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            MazeError::Config(_)
                | MazeError::Yaml(_)
                | MazeError::InvalidMaze(_)
                | MazeError::NoEmptyCells
                | MazeError::SessionNotFound { .. }
                | MazeError::SessionInvalid { .. }
                | MazeError::RegistryFull { .. }
                | MazeError::InvalidStart { .. }
        )
    }
}

impl From<String> for MazeError {
    fn from(msg: String) -> Self {
        MazeError::Internal(msg)
    }
}

impl From<&str> for MazeError {
    fn from(msg: &str) -> Self {
        MazeError::Internal(msg.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_classification() {
        assert!(MazeError::RegistryFull { capacity: 4 }.is_configuration());
        assert!(MazeError::SessionInvalid {
            name: "s".into(),
            reason: "bad magic".into()
        }
        .is_configuration());
        assert!(!MazeError::LockTimeout(Duration::from_millis(5)).is_configuration());
        assert!(!MazeError::from("boom").is_configuration());
    }

    #[test]
    fn test_display_messages() {
        let err = MazeError::RegistryFull { capacity: 3 };
        assert_eq!(err.to_string(), "Runner registry is full (3 slots)");

        let err = MazeError::InvalidStart { col: 2, row: 7 };
        assert!(err.to_string().contains("(2, 7)"));
    }
}
