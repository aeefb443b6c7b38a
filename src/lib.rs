//! Snake Arcade - a single-screen snake game for the terminal
//!
//! This library provides:
//! - Core simulation (game module), free of any I/O
//! - Keyboard mapping (input module)
//! - TUI rendering (render module)
//! - Sound cues for game events (audio module)
//! - Session stats (metrics module)
//! - The interactive play loop (modes module)

pub mod audio;
pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
