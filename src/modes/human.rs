use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::time::{Instant, Interval, MissedTickBehavior, interval, interval_at};
use tracing::info;

use crate::audio::SoundCues;
use crate::game::{GameConfig, GameEngine, GameEvent};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::Renderer;

/// Interactive play in the terminal.
///
/// One select loop owns the engine, so key presses and ticks never interleave.
pub struct HumanMode {
    engine: GameEngine,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    sounds: SoundCues,
    should_quit: bool,
    /// The "restart?" question is showing
    prompt_open: bool,
}

impl HumanMode {
    pub fn new(config: GameConfig, seed: Option<u64>) -> Result<Self> {
        let sounds = SoundCues::from_config(config.sound);
        let engine = match seed {
            Some(seed) => GameEngine::with_seed(config, seed),
            None => GameEngine::new(config),
        }
        .context("Invalid game configuration")?;

        Ok(Self::with_engine(engine, sounds))
    }

    pub fn with_engine(engine: GameEngine, sounds: SoundCues) -> Self {
        Self {
            engine,
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            sounds,
            should_quit: false,
            prompt_open: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        info!(
            width = self.engine.config().grid_width,
            height = self.engine.config().grid_height,
            "game started"
        );

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        info!(
            games_played = self.metrics.games_played,
            best_length = self.metrics.best_length,
            apples_eaten = self.metrics.apples_eaten,
            "session ended"
        );

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        let mut tick_timer = tick_timer(self.engine.tick_interval());

        // Render at 30 FPS (33ms per frame)
        let render_interval = Duration::from_millis(33);
        let mut render_timer = interval(render_interval);

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event
                        && self.handle_event(event)
                    {
                        tick_timer = tick_timer_after(self.engine.tick_interval());
                    }
                }

                // Game logic tick
                _ = tick_timer.tick() => {
                    if self.update_game() {
                        tick_timer = tick_timer_after(self.engine.tick_interval());
                    }
                }

                // Render frame
                _ = render_timer.tick() => {
                    self.metrics.update(self.engine.is_running());
                    terminal.draw(|frame| {
                        self.renderer.render(
                            frame,
                            self.engine.snapshot(),
                            &self.metrics,
                            self.prompt_open,
                        );
                    }).context("Failed to draw frame")?;
                    self.sounds.flush_to(terminal.backend_mut());
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// Returns true when the game restarted and the tick timer must follow
    fn handle_event(&mut self, event: Event) -> bool {
        let Event::Key(key) = event else {
            return false;
        };

        // Only process key press events, not release
        if key.kind != KeyEventKind::Press {
            return false;
        }

        let action = self.input_handler.handle_key_event(key);
        self.apply_action(action)
    }

    fn apply_action(&mut self, action: KeyAction) -> bool {
        match action {
            KeyAction::Steer(direction) => {
                self.engine.set_direction(direction);
            }
            KeyAction::Restart => {
                if !self.engine.is_running() {
                    self.restart_game();
                    return true;
                }
            }
            KeyAction::Decline => {
                self.prompt_open = false;
            }
            KeyAction::Quit => {
                self.should_quit = true;
            }
            KeyAction::None => {}
        }

        false
    }

    /// Advance one tick. Returns true when the tick interval changed.
    fn update_game(&mut self) -> bool {
        let before = self.engine.tick_interval();

        for event in self.engine.tick() {
            self.sounds.on_event(&event);
            self.metrics.record(&event);

            if let GameEvent::GameOver { collision, length } = event {
                info!(?collision, length, "game over");
                self.prompt_open = true;
            }
        }

        self.engine.tick_interval() != before
    }

    fn restart_game(&mut self) {
        self.engine.restart();
        self.metrics.on_game_start();
        self.prompt_open = false;
        info!("game restarted");
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

fn tick_timer(period: Duration) -> Interval {
    let mut timer = interval(period);
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    timer
}

/// Timer whose first tick is one full period away
fn tick_timer_after(period: Duration) -> Interval {
    let mut timer = interval_at(Instant::now() + period, period);
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    timer
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{CollisionType, Direction, GameStatus};

    fn mode() -> HumanMode {
        let config = GameConfig {
            obstacle_count: 0,
            ..GameConfig::small()
        };
        let engine = GameEngine::with_seed(config, 21).unwrap();
        HumanMode::with_engine(engine, SoundCues::silent())
    }

    fn play_until_over(mode: &mut HumanMode) {
        // Heading right from (5, 5) on an open 10-wide grid reaches the wall.
        for _ in 0..100 {
            if !mode.engine.is_running() {
                return;
            }
            mode.update_game();
        }
        panic!("game never ended");
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = GameConfig {
            sound: false,
            ..GameConfig::new(0, 0)
        };
        assert!(HumanMode::new(config, Some(1)).is_err());
    }

    #[test]
    fn test_game_initialization() {
        let mode = mode();
        assert!(mode.engine.is_running());
        assert!(!mode.prompt_open);
        assert_eq!(mode.engine.snapshot().length(), 3);
    }

    #[test]
    fn test_game_over_opens_prompt() {
        let mut mode = mode();
        play_until_over(&mut mode);

        assert!(mode.prompt_open);
        assert_eq!(mode.metrics.games_played, 1);
        assert_eq!(mode.metrics.best_length, mode.engine.snapshot().length());
        assert_eq!(mode.metrics.last_collision, Some(CollisionType::Wall));
        assert_eq!(
            mode.metrics.apples_eaten,
            mode.engine.snapshot().apples_eaten
        );
    }

    #[test]
    fn test_accepting_prompt_restarts() {
        let mut mode = mode();
        play_until_over(&mut mode);

        assert!(mode.apply_action(KeyAction::Restart));

        assert!(!mode.prompt_open);
        assert!(mode.engine.is_running());
        assert_eq!(mode.engine.snapshot().length(), 3);
        assert_eq!(mode.metrics.last_collision, None);
        assert_eq!(mode.metrics.games_played, 1);
    }

    #[test]
    fn test_declining_prompt_keeps_game_over() {
        let mut mode = mode();
        play_until_over(&mut mode);
        let frozen = mode.engine.snapshot().clone();

        assert!(!mode.apply_action(KeyAction::Decline));
        mode.update_game();

        assert!(!mode.prompt_open);
        assert_eq!(mode.engine.snapshot().status, GameStatus::GameOver);
        assert_eq!(mode.engine.snapshot(), &frozen);
    }

    #[test]
    fn test_restart_ignored_while_running() {
        let mut mode = mode();
        mode.update_game();
        let steps = mode.engine.snapshot().steps;

        assert!(!mode.apply_action(KeyAction::Restart));
        assert_eq!(mode.engine.snapshot().steps, steps);
    }

    #[test]
    fn test_steer_reaches_engine() {
        let mut mode = mode();
        mode.apply_action(KeyAction::Steer(Direction::Left));
        mode.apply_action(KeyAction::Steer(Direction::Down));
        mode.update_game();

        assert_eq!(mode.engine.snapshot().snake.direction, Direction::Down);
    }

    #[test]
    fn test_quit() {
        let mut mode = mode();
        mode.apply_action(KeyAction::Quit);
        assert!(mode.should_quit);
    }
}
