use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Largest grid side a game can use
pub const MAX_GRID_SIDE: usize = 1024;

/// Reasons a [`GameConfig`] cannot drive a game
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("grid must be at least 1x1, got {width}x{height}")]
    EmptyGrid { width: usize, height: usize },

    #[error("grid sides must be at most {max}, got {width}x{height}")]
    GridTooLarge {
        width: usize,
        height: usize,
        max: usize,
    },

    #[error("initial snake length must be at least 1")]
    EmptySnake,

    #[error("starting snake at ({x}, {y}) with length {length} does not fit a {width}x{height} grid")]
    StartOutOfBounds {
        x: i32,
        y: i32,
        length: usize,
        width: usize,
        height: usize,
    },

    #[error("minimum tick interval must be positive")]
    ZeroTickFloor,

    #[error("minimum tick interval ({min_ms} ms) exceeds base interval ({base_ms} ms)")]
    FloorAboveBase { min_ms: u64, base_ms: u64 },

    #[error("speed-up period must be at least 1 apple")]
    ZeroSpeedupPeriod,
}

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the game grid in cells
    pub grid_width: usize,
    /// Height of the game grid in cells
    pub grid_height: usize,
    /// Grid pitch in pixels, for renderers that draw on a pixel canvas
    pub cell_size: u32,

    /// Initial length of the snake
    pub initial_snake_length: usize,
    /// Column of the snake's head at game start
    pub start_x: i32,
    /// Row of the snake's head at game start
    pub start_y: i32,

    /// Number of obstacle cells generated per game
    pub obstacle_count: usize,

    /// Tick interval at game start, in milliseconds
    pub base_tick_ms: u64,
    /// The tick interval never drops below this
    pub min_tick_ms: u64,
    /// How much faster each speed-up makes the game, in milliseconds
    pub speedup_step_ms: u64,
    /// Speed up whenever the snake length is a multiple of this
    pub speedup_every: usize,

    /// Ring the terminal bell on apples and game over
    pub sound: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 30,
            grid_height: 30,
            cell_size: 10,
            initial_snake_length: 3,
            start_x: 5,
            start_y: 5,
            obstacle_count: 5,
            base_tick_ms: 150,
            min_tick_ms: 50,
            speedup_step_ms: 10,
            speedup_every: 5,
            sound: true,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(10, 10)
    }

    /// Load a configuration from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let config: GameConfig = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {:?}", path))?;
        Ok(config)
    }

    pub fn base_tick_interval(&self) -> Duration {
        Duration::from_millis(self.base_tick_ms)
    }

    pub fn min_tick_interval(&self) -> Duration {
        Duration::from_millis(self.min_tick_ms)
    }

    pub fn speedup_step(&self) -> Duration {
        Duration::from_millis(self.speedup_step_ms)
    }

    /// Check that the values describe a playable game
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_width == 0 || self.grid_height == 0 {
            return Err(ConfigError::EmptyGrid {
                width: self.grid_width,
                height: self.grid_height,
            });
        }

        if self.initial_snake_length == 0 {
            return Err(ConfigError::EmptySnake);
        }

        if self.grid_width > MAX_GRID_SIDE || self.grid_height > MAX_GRID_SIDE {
            return Err(ConfigError::GridTooLarge {
                width: self.grid_width,
                height: self.grid_height,
                max: MAX_GRID_SIDE,
            });
        }

        // The starting body extends to the left of the head.
        let head_x = usize::try_from(self.start_x)
            .ok()
            .filter(|&x| x < self.grid_width);
        let head_y = usize::try_from(self.start_y)
            .ok()
            .filter(|&y| y < self.grid_height);
        let fits = matches!(
            (head_x, head_y),
            (Some(x), Some(_)) if self.initial_snake_length <= x + 1
        );
        if !fits {
            return Err(ConfigError::StartOutOfBounds {
                x: self.start_x,
                y: self.start_y,
                length: self.initial_snake_length,
                width: self.grid_width,
                height: self.grid_height,
            });
        }

        if self.min_tick_ms == 0 {
            return Err(ConfigError::ZeroTickFloor);
        }

        if self.min_tick_ms > self.base_tick_ms {
            return Err(ConfigError::FloorAboveBase {
                min_ms: self.min_tick_ms,
                base_ms: self.base_tick_ms,
            });
        }

        if self.speedup_every == 0 {
            return Err(ConfigError::ZeroSpeedupPeriod);
        }

        Ok(())
    }
}
