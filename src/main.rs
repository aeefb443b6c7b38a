use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use snake_arcade::game::GameConfig;
use snake_arcade::modes::HumanMode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "snake_arcade")]
#[command(version, about = "Snake with apples, obstacles and speed-ups")]
struct Cli {
    /// JSON file with game settings; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Grid width in cells
    #[arg(long)]
    width: Option<usize>,

    /// Grid height in cells
    #[arg(long)]
    height: Option<usize>,

    /// Number of obstacle cells per game
    #[arg(long)]
    obstacles: Option<usize>,

    /// Starting tick interval in milliseconds
    #[arg(long)]
    base_tick_ms: Option<u64>,

    /// Fastest allowed tick interval in milliseconds
    #[arg(long)]
    min_tick_ms: Option<u64>,

    /// Seed for apple and obstacle placement
    #[arg(long)]
    seed: Option<u64>,

    /// Disable the terminal bell
    #[arg(long)]
    mute: bool,

    /// Write logs to this file (filtered by RUST_LOG, default "info")
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn game_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::from_json_file(path)?,
            None => GameConfig::default(),
        };

        if let Some(width) = self.width {
            config.grid_width = width;
        }
        if let Some(height) = self.height {
            config.grid_height = height;
        }
        if let Some(obstacles) = self.obstacles {
            config.obstacle_count = obstacles;
        }
        if let Some(base) = self.base_tick_ms {
            config.base_tick_ms = base;
        }
        if let Some(min) = self.min_tick_ms {
            config.min_tick_ms = min;
        }
        if self.mute {
            config.sound = false;
        }

        config.validate().context("Invalid game configuration")?;
        Ok(config)
    }
}

/// The terminal belongs to the game, so logs only go to a file
fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create log file {:?}", path))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        init_logging(path)?;
    }

    let config = cli.game_config()?;

    let mut human_mode = HumanMode::new(config, cli.seed)?;
    human_mode.run().await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_defaults() {
        let cli = Cli::parse_from([
            "snake_arcade",
            "--width",
            "16",
            "--obstacles",
            "0",
            "--mute",
        ]);
        let config = cli.game_config().unwrap();

        assert_eq!(config.grid_width, 16);
        assert_eq!(config.grid_height, 30);
        assert_eq!(config.obstacle_count, 0);
        assert!(!config.sound);
    }

    #[test]
    fn test_invalid_flags_rejected() {
        let cli = Cli::parse_from(["snake_arcade", "--min-tick-ms", "500"]);
        assert!(cli.game_config().is_err());
    }
}
