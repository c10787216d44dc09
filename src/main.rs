use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tap_snake::game::GameConfig;
use tap_snake::modes::HumanMode;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(name = "tap_snake")]
#[command(version, about = "Snake on a bordered grid, steered by clicking the board")]
struct Cli {
    /// Grid width, border included (overrides the config file)
    #[arg(long)]
    width: Option<usize>,

    /// Grid height, border included (overrides the config file)
    #[arg(long)]
    height: Option<usize>,

    /// JSON game config
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for food placement
    #[arg(long)]
    seed: Option<u64>,

    /// Directory for the log file (defaults to the system temp dir)
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_dir = cli
        .log_dir
        .clone()
        .unwrap_or_else(|| std::env::temp_dir().join("tap_snake"));
    let _guard = setup_logging(&log_dir)?;

    let config = build_config(&cli)?;
    tracing::info!(
        width = config.grid_width,
        height = config.grid_height,
        seed = ?cli.seed,
        "starting"
    );

    let mut human_mode = HumanMode::new(config, cli.seed)?;
    human_mode.run().await
}

/// Config file first, then CLI overrides
fn build_config(cli: &Cli) -> Result<GameConfig> {
    let mut config = match &cli.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };

    if let Some(width) = cli.width {
        config.grid_width = width;
    }
    if let Some(height) = cli.height {
        config.grid_height = height;
    }

    config.validate().context("Invalid board size")?;
    Ok(config)
}

/// Log to a file only; the terminal belongs to the TUI
fn setup_logging(log_dir: &Path) -> Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

    let file_appender = tracing_appender::rolling::never(log_dir, "tap_snake.log");
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_target(false)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    tracing::info!("Log file: {}", log_dir.join("tap_snake.log").display());

    Ok(guard)
}
