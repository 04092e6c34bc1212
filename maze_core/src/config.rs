//! Session and runner configuration
//!
//! Values come from built-in defaults, an optional YAML file and the
//! `MAZE_SHM_DIR` environment variable. Command-line front-ends apply their
//! flags on top of the loaded value.

use crate::error::{MazeError, MazeResult};
use crate::memory::shm_base_dir;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable overriding the shared-memory directory
pub const SHM_DIR_ENV: &str = "MAZE_SHM_DIR";

/// Default session name shared by the coordinator and all runners
pub const DEFAULT_SESSION_NAME: &str = "maze_runner";

/// Upper bound on registry slots, keeps slot indices well inside `u32`
pub const MAX_RUNNERS: usize = 100_000;

/// Configuration shared by the coordinator and runners of one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MazeConfig {
    /// Well-known session name, must match across all participants
    pub session_name: String,
    /// Directory holding the session region (platform default when unset)
    pub shm_dir: Option<PathBuf>,
    /// Number of registry slots published by the coordinator
    pub max_runners: usize,
    /// Pause between traversal steps
    pub step_delay_ms: u64,
    /// How long lock acquisition may spin before giving up (0 waits forever)
    pub lock_timeout_ms: u64,
    /// Time runners get to observe `quit` before the region is unlinked
    pub shutdown_grace_ms: u64,
    /// Seed for start placement, entropy when unset
    pub seed: Option<u64>,
}

impl Default for MazeConfig {
    fn default() -> Self {
        Self {
            session_name: DEFAULT_SESSION_NAME.to_string(),
            shm_dir: None,
            max_runners: 50,
            step_delay_ms: 100,
            lock_timeout_ms: 1000,
            shutdown_grace_ms: 200,
            seed: None,
        }
    }
}

impl MazeConfig {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> MazeResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            MazeError::config(format!("cannot read {}: {}", path.display(), e))
        })?;
        let config: MazeConfig = serde_yaml::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults, then the optional file, then environment overrides
    pub fn load(path: Option<&Path>) -> MazeResult<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env();
        Ok(config)
    }

    /// Apply `MAZE_SHM_DIR` when it is set and non-empty
    pub fn apply_env(&mut self) {
        if let Ok(dir) = std::env::var(SHM_DIR_ENV) {
            if !dir.trim().is_empty() {
                self.shm_dir = Some(PathBuf::from(dir));
            }
        }
    }

    pub fn validate(&self) -> MazeResult<()> {
        if self.session_name.trim().is_empty() {
            return Err(MazeError::config("session_name must not be empty"));
        }
        if self.max_runners == 0 {
            return Err(MazeError::config("max_runners must be at least 1"));
        }
        if self.max_runners > MAX_RUNNERS {
            return Err(MazeError::config(format!(
                "max_runners {} exceeds the limit of {}",
                self.max_runners, MAX_RUNNERS
            )));
        }
        Ok(())
    }

    pub fn with_session_name<S: Into<String>>(mut self, name: S) -> Self {
        self.session_name = name.into();
        self
    }

    pub fn with_shm_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.shm_dir = Some(dir.into());
        self
    }

    pub fn with_step_delay(mut self, delay: Duration) -> Self {
        self.step_delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn with_max_runners(mut self, max_runners: usize) -> Self {
        self.max_runners = max_runners;
        self
    }

    /// Directory the session region lives in
    pub fn shm_dir(&self) -> PathBuf {
        self.shm_dir.clone().unwrap_or_else(shm_base_dir)
    }

    pub fn step_delay(&self) -> Duration {
        Duration::from_millis(self.step_delay_ms)
    }

    pub fn lock_timeout(&self) -> Option<Duration> {
        (self.lock_timeout_ms > 0).then(|| Duration::from_millis(self.lock_timeout_ms))
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_millis(self.shutdown_grace_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = MazeConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.session_name, DEFAULT_SESSION_NAME);
        assert_eq!(config.step_delay(), Duration::from_millis(100));
        assert_eq!(config.lock_timeout(), Some(Duration::from_secs(1)));
    }

    #[test]
    fn test_zero_lock_timeout_waits_forever() {
        let config = MazeConfig {
            lock_timeout_ms: 0,
            ..MazeConfig::default()
        };
        assert_eq!(config.lock_timeout(), None);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "session_name: lab3\nstep_delay_ms: 0\nseed: 42").unwrap();

        let config = MazeConfig::from_file(file.path()).unwrap();
        assert_eq!(config.session_name, "lab3");
        assert_eq!(config.step_delay_ms, 0);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.max_runners, 50);
    }

    #[test]
    fn test_rejects_zero_runners() {
        let config = MazeConfig::default().with_max_runners(0);
        assert!(matches!(config.validate(), Err(MazeError::Config(_))));
    }

    #[test]
    fn test_rejects_blank_session_name() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "session_name: '  '").unwrap();
        assert!(MazeConfig::from_file(file.path()).is_err());
    }

    #[test]
    fn test_step_delay_saturates() {
        let config = MazeConfig::default().with_step_delay(Duration::from_millis(250));
        assert_eq!(config.step_delay_ms, 250);

        let config = MazeConfig::default().with_step_delay(Duration::MAX);
        assert_eq!(config.step_delay_ms, u64::MAX);
    }

    #[test]
    fn test_explicit_shm_dir_wins_over_platform_default() {
        let config = MazeConfig::default().with_shm_dir("/tmp/maze-test");
        assert_eq!(config.shm_dir(), PathBuf::from("/tmp/maze-test"));
    }
}
