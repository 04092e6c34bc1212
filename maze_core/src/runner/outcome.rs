use std::fmt;

/// How a runner finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Reached an exit cell
    Done,
    /// No open neighbour left to move to
    Blocked,
    /// Observed the session quit flag
    Aborted,
}

impl RunOutcome {
    /// Process exit code for setup failures, distinct from every outcome
    pub const ERROR_EXIT_CODE: u8 = 3;

    pub fn exit_code(self) -> u8 {
        match self {
            RunOutcome::Done => 0,
            RunOutcome::Blocked => 1,
            RunOutcome::Aborted => 2,
        }
    }

    pub fn is_success(self) -> bool {
        self == RunOutcome::Done
    }
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunOutcome::Done => write!(f, "Done"),
            RunOutcome::Blocked => write!(f, "Blocked"),
            RunOutcome::Aborted => write!(f, "Aborted"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_are_distinct() {
        let codes = [
            RunOutcome::Done.exit_code(),
            RunOutcome::Blocked.exit_code(),
            RunOutcome::Aborted.exit_code(),
            RunOutcome::ERROR_EXIT_CODE,
        ];
        for (i, a) in codes.iter().enumerate() {
            for b in &codes[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert_eq!(RunOutcome::Done.exit_code(), 0);
    }

    #[test]
    fn test_only_done_is_success() {
        assert!(RunOutcome::Done.is_success());
        assert!(!RunOutcome::Blocked.is_success());
        assert!(!RunOutcome::Aborted.is_success());
    }
}
