use std::io::{self, Write};

use tracing::debug;

use crate::game::GameEvent;

/// A sound the game wants played
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    Eat,
    GameOver,
}

impl SoundCue {
    /// Sound for an engine event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::AteApple { .. } => Some(SoundCue::Eat),
            GameEvent::GameOver { .. } => Some(SoundCue::GameOver),
            GameEvent::SpeedUp { .. } => None,
        }
    }
}

/// Something that can play a cue
pub trait SoundSink {
    fn play(&mut self, cue: SoundCue) -> io::Result<()>;

    /// Emit anything queued by `play` through the terminal's own writer
    fn flush_to(&mut self, _out: &mut dyn Write) -> io::Result<()> {
        Ok(())
    }
}

/// Rings the terminal bell: once for an apple, twice for game over.
///
/// Rings are queued and written through the terminal backend between
/// frames, so they never interleave with a frame being drawn.
#[derive(Default)]
pub struct TerminalBell {
    pending: Vec<u8>,
}

impl TerminalBell {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SoundSink for TerminalBell {
    fn play(&mut self, cue: SoundCue) -> io::Result<()> {
        let rings: &[u8] = match cue {
            SoundCue::Eat => b"\x07",
            SoundCue::GameOver => b"\x07\x07",
        };
        self.pending.extend_from_slice(rings);
        Ok(())
    }

    fn flush_to(&mut self, out: &mut dyn Write) -> io::Result<()> {
        if self.pending.is_empty() {
            return Ok(());
        }

        let rings = std::mem::take(&mut self.pending);
        out.write_all(&rings)?;
        out.flush()
    }
}

/// Discards every cue
pub struct Silent;

impl SoundSink for Silent {
    fn play(&mut self, _cue: SoundCue) -> io::Result<()> {
        Ok(())
    }
}

/// Turns engine events into sounds
pub struct SoundCues {
    sink: Box<dyn SoundSink + Send>,
}

impl SoundCues {
    pub fn new(sink: Box<dyn SoundSink + Send>) -> Self {
        Self { sink }
    }

    pub fn silent() -> Self {
        Self::new(Box::new(Silent))
    }

    /// Terminal bell, or silence when sound is disabled
    pub fn from_config(sound: bool) -> Self {
        if sound {
            Self::new(Box::new(TerminalBell::new()))
        } else {
            Self::silent()
        }
    }

    pub fn on_event(&mut self, event: &GameEvent) {
        let Some(cue) = SoundCue::for_event(event) else {
            return;
        };

        if let Err(err) = self.sink.play(cue) {
            debug!(?err, ?cue, "sound cue skipped");
        }
    }

    /// Write queued sounds to `out`, normally the terminal backend after a frame
    pub fn flush_to(&mut self, out: &mut dyn Write) {
        if let Err(err) = self.sink.flush_to(out) {
            debug!(?err, "queued sounds dropped");
        }
    }
}
