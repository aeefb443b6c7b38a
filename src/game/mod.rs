//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! The engine is a plain state machine: callers drive it with ticks and
//! direction requests, read it through snapshots and react to the events it returns.

pub mod config;
pub mod direction;
pub mod engine;
pub mod state;

// Re-export commonly used types
pub use config::{ConfigError, GameConfig, MAX_GRID_SIDE};
pub use direction::Direction;
pub use engine::{GameEngine, GameEvent, START_DIRECTION};
pub use state::{CollisionType, GameState, GameStatus, Position, Snake};
