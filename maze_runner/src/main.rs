use anyhow::{Context, Result};
use clap::Parser;
use maze_core::{MazeConfig, MazeRunner, RunOutcome};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "maze_runner")]
#[command(about = "Walk a published maze from an assigned start cell")]
#[command(version)]
struct Args {
    /// Session name published by the coordinator
    #[arg(short = 's', long = "session")]
    session: Option<String>,

    /// Pause between steps in milliseconds
    #[arg(short = 'd', long = "delay-ms")]
    delay_ms: Option<u64>,

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
        if let Some(delay) = self.delay_ms {
            config.step_delay_ms = delay;
        }
        if let Some(dir) = &self.shm_dir {
            config.shm_dir = Some(dir.clone());
        }
        Ok(config)
    }
}

fn run(args: &Args) -> Result<RunOutcome> {
    let config = args.resolve_config()?;
    let mut runner = MazeRunner::attach(&config)
        .with_context(|| format!("failed to join session '{}'", config.session_name))?;

    let outcome = runner.run();
    let stats = runner.traversal().stats();
    let summary = format!(
        "Slot {} finished {} at {} ({} steps, {} marks, {} unmarks, {} publish failures)",
        runner.slot(),
        outcome,
        runner.position(),
        stats.steps,
        stats.marks,
        stats.unmarks,
        runner.stats().publish_failures
    );
    if outcome.is_success() {
        tracing::info!("{}", summary);
    } else {
        tracing::warn!("{}", summary);
    }
    Ok(outcome)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(outcome) => ExitCode::from(outcome.exit_code()),
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::from(RunOutcome::ERROR_EXIT_CODE)
        }
    }
}
