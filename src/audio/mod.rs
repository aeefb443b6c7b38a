//! Sound feedback for game events
//!
//! Sounds are best-effort: a sink that fails is logged and skipped, and
//! nothing here can affect the simulation.

pub mod cues;

pub use cues::{Silent, SoundCue, SoundCues, SoundSink, TerminalBell};
