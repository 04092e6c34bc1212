// Cross-platform shared memory path abstraction
//
// Linux: /dev/shm/maze (tmpfs - RAM-backed)
// macOS: /tmp/maze (no /dev/shm)
// Windows: %TEMP%\maze

use std::path::{Path, PathBuf};

/// Get the base directory for maze session regions
///
/// - Linux: `/dev/shm/maze` (tmpfs)
/// - macOS: `/tmp/maze`
/// - Windows: `%TEMP%\maze`
pub fn shm_base_dir() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        PathBuf::from("/dev/shm/maze")
    }

    #[cfg(target_os = "macos")]
    {
        PathBuf::from("/tmp/maze")
    }

    #[cfg(target_os = "windows")]
    {
        std::env::temp_dir().join("maze")
    }

    #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
    {
        PathBuf::from("/tmp/maze")
    }
}

/// File name used for a session region
pub fn session_file_name(session_name: &str) -> String {
    let safe_name = session_name.replace(['/', ':', '\\'], "_");
    format!("maze_{}", safe_name)
}

/// Full path of a session region inside `dir`
pub fn session_path(dir: &Path, session_name: &str) -> PathBuf {
    dir.join(session_file_name(session_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_dir_is_valid() {
        let base = shm_base_dir();
        assert!(!base.as_os_str().is_empty());
        assert!(base.ends_with("maze"));
    }

    #[test]
    fn test_session_names_are_sanitized() {
        assert_eq!(session_file_name("lab/one:two"), "maze_lab_one_two");
        assert_eq!(session_file_name(r"lab\three"), "maze_lab_three");

        let path = session_path(Path::new("/dev/shm/maze"), "demo");
        assert_eq!(path, PathBuf::from("/dev/shm/maze/maze_demo"));
    }
}
