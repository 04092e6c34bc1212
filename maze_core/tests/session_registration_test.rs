/// Registration protocol and session validation across independent mappings
use maze_core::memory::session_path;
use maze_core::{Coordinator, MazeConfig, MazeError, MazeGeometry, Position, SharedSession};
use std::collections::HashSet;
use std::path::Path;
use std::thread;

fn config(dir: &Path) -> MazeConfig {
    let mut config = MazeConfig::default()
        .with_session_name("registration")
        .with_shm_dir(dir);
    config.shutdown_grace_ms = 0;
    config
}

fn maze() -> MazeGeometry {
    MazeGeometry::from_rows(&["#######", "#     #", "# ### #", "#    E#", "#######"]).unwrap()
}

#[test]
fn test_concurrent_registration_yields_distinct_slots() {
    const RUNNERS: usize = 8;

    let dir = tempfile::tempdir().unwrap();
    let starts = vec![Position::new(1, 1); RUNNERS];
    let coordinator = Coordinator::publish(&config(dir.path()), &maze(), &starts).unwrap();

    let handles: Vec<_> = (0..RUNNERS)
        .map(|_| {
            let cfg = config(dir.path());
            thread::spawn(move || {
                let session = SharedSession::attach(&cfg).unwrap();
                session.register().unwrap()
            })
        })
        .collect();

    let slots: HashSet<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(slots.len(), RUNNERS);
    assert!(slots.iter().all(|&slot| slot < RUNNERS));
    assert_eq!(coordinator.snapshot().unwrap().registered(), RUNNERS);
}

#[test]
fn test_registry_full_after_capacity() {
    let dir = tempfile::tempdir().unwrap();
    let starts = [Position::new(1, 1), Position::new(5, 1)];
    let _coordinator = Coordinator::publish(&config(dir.path()), &maze(), &starts).unwrap();

    let session = SharedSession::attach(&config(dir.path())).unwrap();
    assert_eq!(session.register().unwrap(), 0);
    assert_eq!(session.register().unwrap(), 1);

    let err = session.register().unwrap_err();
    assert!(matches!(err, MazeError::RegistryFull { capacity: 2 }));
    assert!(err.is_configuration());
}

#[test]
fn test_attach_to_missing_session_fails() {
    let dir = tempfile::tempdir().unwrap();
    let err = SharedSession::attach(&config(dir.path())).unwrap_err();
    assert!(matches!(err, MazeError::SessionNotFound { .. }));
}

#[test]
fn test_attach_to_untagged_region_fails() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(session_path(dir.path(), "registration"), vec![0u8; 4096]).unwrap();

    let err = SharedSession::attach(&config(dir.path())).unwrap_err();
    assert!(matches!(err, MazeError::SessionInvalid { .. }));
}

#[test]
fn test_attach_after_shutdown_fails() {
    let dir = tempfile::tempdir().unwrap();
    let mut coordinator =
        Coordinator::publish(&config(dir.path()), &maze(), &[Position::new(1, 1)]).unwrap();
    let early = SharedSession::attach(&config(dir.path())).unwrap();

    coordinator.shutdown().unwrap();

    assert!(SharedSession::attach(&config(dir.path())).is_err());
    // A mapping taken before shutdown sees the session as retired
    assert!(matches!(
        early.register(),
        Err(MazeError::SessionInvalid { .. })
    ));
}

#[test]
fn test_sessions_are_isolated_by_name() {
    let dir = tempfile::tempdir().unwrap();
    let _first =
        Coordinator::publish(&config(dir.path()), &maze(), &[Position::new(1, 1)]).unwrap();
    let other = config(dir.path()).with_session_name("other");
    let _second = Coordinator::publish(&other, &maze(), &[Position::new(5, 1); 3]).unwrap();

    assert_eq!(SharedSession::attach(&config(dir.path())).unwrap().capacity(), 1);
    assert_eq!(SharedSession::attach(&other).unwrap().capacity(), 3);
}
