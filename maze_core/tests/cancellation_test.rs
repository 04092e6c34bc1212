/// Cooperative cancellation through the session quit flag
use maze_core::{Coordinator, MazeConfig, MazeGeometry, MazeRunner, Position, RunOutcome};
use std::path::Path;
use std::thread;
use std::time::Duration;

// The mark/unmark heuristic never leaves this maze: the exit sits in a
// separate pocket and the left region keeps being reopened.
const CYCLING_MAZE: [&str; 5] = ["#######", "#S  # #", "### # #", "#   #E#", "#######"];

fn config(dir: &Path, step_delay: Duration) -> MazeConfig {
    let mut config = MazeConfig::default()
        .with_session_name("cancel")
        .with_shm_dir(dir)
        .with_step_delay(step_delay);
    config.shutdown_grace_ms = 0;
    config
}

#[test]
fn test_quit_aborts_cycling_runner() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(dir.path(), Duration::from_millis(1));
    let maze = MazeGeometry::from_rows(&CYCLING_MAZE).unwrap();
    let coordinator = Coordinator::publish(&cfg, &maze, &[Position::new(1, 1)]).unwrap();

    let mut runner = MazeRunner::attach(&cfg).unwrap();
    let handle = thread::spawn(move || {
        let outcome = runner.run();
        (outcome, runner.position(), runner.stats().published)
    });

    thread::sleep(Duration::from_millis(100));
    coordinator.request_quit().unwrap();

    let (outcome, position, published) = handle.join().unwrap();
    assert_eq!(outcome, RunOutcome::Aborted);
    assert!(published > 0);

    // Nothing is published after the runner stops
    let snapshot = coordinator.snapshot().unwrap();
    assert_eq!(snapshot.position(0), Some(position));
    assert_ne!(position, Position::new(5, 3));
}

#[test]
fn test_quit_before_run_publishes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(dir.path(), Duration::ZERO);
    let maze = MazeGeometry::from_rows(&["#####", "#   #", "# # #", "#  E#", "#####"]).unwrap();
    let coordinator = Coordinator::publish(&cfg, &maze, &[Position::new(1, 1)]).unwrap();

    let mut runner = MazeRunner::attach(&cfg).unwrap();
    coordinator.request_quit().unwrap();

    assert_eq!(runner.run(), RunOutcome::Aborted);
    assert_eq!(runner.stats().published, 0);
    assert_eq!(runner.position(), Position::new(1, 1));
}

#[test]
fn test_shutdown_stops_every_runner() {
    const RUNNERS: usize = 4;

    let dir = tempfile::tempdir().unwrap();
    let cfg = config(dir.path(), Duration::from_millis(1));
    let maze = MazeGeometry::from_rows(&CYCLING_MAZE).unwrap();
    let starts = [
        Position::new(1, 1),
        Position::new(3, 1),
        Position::new(3, 3),
        Position::new(1, 3),
    ];
    let mut coordinator = Coordinator::publish(&cfg, &maze, &starts).unwrap();

    let handles: Vec<_> = (0..RUNNERS)
        .map(|_| {
            let mut runner = MazeRunner::attach(&cfg).unwrap();
            thread::spawn(move || runner.run())
        })
        .collect();

    thread::sleep(Duration::from_millis(50));
    coordinator.shutdown().unwrap();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), RunOutcome::Aborted);
    }
}
