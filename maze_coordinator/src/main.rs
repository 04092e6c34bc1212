use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use crossbeam::channel;
use crossbeam::select;
use maze_core::{Coordinator, MazeConfig};
use std::io::BufRead;
use std::path::PathBuf;
use std::time::Duration;

const STATUS_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Parser)]
#[command(name = "maze_coordinator")]
#[command(about = "Publish a maze session for maze runners")]
#[command(version)]
struct Args {
    /// Maze text file
    #[arg(default_value = "data/maze0.txt")]
    maze_file: PathBuf,

    /// Session name runners attach to
    #[arg(short = 's', long = "session")]
    session: Option<String>,

    /// Number of runner slots to publish
    #[arg(short = 'n', long = "runners")]
    runners: Option<usize>,

    /// Seed for start placement
    #[arg(long)]
    seed: Option<u64>,

    /// Shared-memory directory
    #[arg(long = "shm-dir")]
    shm_dir: Option<PathBuf>,

    /// Configuration file (YAML)
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,
}

impl Args {
    fn resolve_config(&self) -> Result<MazeConfig> {
        let mut config =
            MazeConfig::load(self.config.as_deref()).context("failed to load configuration")?;
        if let Some(session) = &self.session {
            config.session_name = session.clone();
        }
        if let Some(runners) = self.runners {
            config.max_runners = runners;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(dir) = &self.shm_dir {
            config.shm_dir = Some(dir.clone());
        }
        config.validate()?;
        Ok(config)
    }
}

enum Trigger {
    Enter,
    CtrlC,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = Args::parse();
    let config = args.resolve_config()?;

    let mut coordinator = Coordinator::from_maze_file(&config, &args.maze_file)
        .with_context(|| format!("failed to publish {}", args.maze_file.display()))?;

    let (tx, rx) = channel::bounded::<Trigger>(2);

    let ctrlc_tx = tx.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        let _ = ctrlc_tx.try_send(Trigger::CtrlC);
    }) {
        tracing::warn!("Failed to set Ctrl+C handler: {}", e);
    }

    std::thread::spawn(move || {
        let mut line = String::new();
        // EOF on stdin also counts as a quit request
        let _ = std::io::stdin().lock().read_line(&mut line);
        let _ = tx.try_send(Trigger::Enter);
    });

    println!(
        "{} Session '{}' published with {} runner slot(s)",
        "✓".green(),
        config.session_name.cyan(),
        config.max_runners
    );
    println!("{}", "Press ENTER to quit".yellow().bold());

    let ticker = channel::tick(STATUS_INTERVAL);
    let trigger = loop {
        select! {
            recv(rx) -> msg => break msg.unwrap_or(Trigger::CtrlC),
            recv(ticker) -> _ => {
                if let Ok(snapshot) = coordinator.snapshot() {
                    tracing::info!(
                        "{} of {} runner(s) registered",
                        snapshot.registered(),
                        snapshot.capacity()
                    );
                }
            }
        }
    };

    match trigger {
        Trigger::Enter => println!("{} Shutting down session...", "!".yellow()),
        Trigger::CtrlC => println!(
            "\n{} Ctrl+C received, shutting down session...",
            "!".yellow()
        ),
    }

    coordinator
        .shutdown()
        .context("failed to retire the session")?;
    println!("{} Session retired", "✓".green());
    Ok(())
}
