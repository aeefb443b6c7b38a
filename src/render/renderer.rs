use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::game::{GameState, Position};
use crate::metrics::{GameMetrics, describe_collision};

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    /// Draw one frame. `prompt_open` shows the restart question over a finished game.
    pub fn render(
        &self,
        frame: &mut Frame,
        state: &GameState,
        metrics: &GameMetrics,
        prompt_open: bool,
    ) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        let stats = self.render_stats(state, metrics);
        frame.render_widget(stats, chunks[0]);

        // Center the game grid horizontally
        let game_area = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(10),
                Constraint::Percentage(80),
                Constraint::Percentage(10),
            ])
            .split(chunks[1])[1];

        // The board stays visible under the game over box
        let grid = self.render_grid(state);
        frame.render_widget(grid, game_area);

        if !state.is_running() {
            let popup = centered_rect(44, 8, game_area);
            frame.render_widget(Clear, popup);
            frame.render_widget(
                self.render_game_over(state, metrics, prompt_open),
                popup,
            );
        }

        let controls = self.render_controls();
        frame.render_widget(controls, chunks[2]);
    }

    fn render_grid(&self, state: &GameState) -> Paragraph<'_> {
        let head = state.snake.head();
        let mut lines = Vec::with_capacity(state.grid_height);

        for y in 0..state.grid_height {
            let mut spans = Vec::with_capacity(state.grid_width);

            for x in 0..state.grid_width {
                let pos = Position::new(x as i32, y as i32);

                let cell = if pos == head {
                    Span::styled(
                        "■ ",
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    )
                } else if state.snake.contains(pos) {
                    Span::styled("□ ", Style::default().fg(Color::Green))
                } else if state.is_obstacle(pos) {
                    Span::styled("██", Style::default().fg(Color::Red))
                } else if pos == state.apple {
                    Span::styled(
                        "@ ",
                        Style::default()
                            .fg(Color::LightRed)
                            .add_modifier(Modifier::BOLD),
                    )
                } else {
                    Span::styled(". ", Style::default().fg(Color::DarkGray))
                };

                spans.push(cell);
            }

            lines.push(Line::from(spans));
        }

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(Color::White))
                    .title(" Snake "),
            )
            .alignment(Alignment::Center)
    }

    fn render_stats(&self, state: &GameState, metrics: &GameMetrics) -> Paragraph<'_> {
        let label = Style::default().fg(Color::Yellow);
        let value = Style::default().fg(Color::White);

        let text = vec![Line::from(vec![
            Span::styled("Length: ", label),
            Span::styled(
                state.length().to_string(),
                value.add_modifier(Modifier::BOLD),
            ),
            Span::raw("   "),
            Span::styled("Tick: ", label),
            Span::styled(format!("{}ms", state.tick_interval.as_millis()), value),
            Span::raw("   "),
            Span::styled("Best: ", label),
            Span::styled(metrics.best_length.to_string(), value),
            Span::raw("   "),
            Span::styled("Games: ", label),
            Span::styled(metrics.games_played.to_string(), value),
            Span::raw("   "),
            Span::styled("Time: ", label),
            Span::styled(metrics.format_time(), value),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_game_over(
        &self,
        state: &GameState,
        metrics: &GameMetrics,
        prompt_open: bool,
    ) -> Paragraph<'_> {
        let key = |k: &'static str, color: Color| {
            Span::styled(k, Style::default().fg(color).add_modifier(Modifier::BOLD))
        };
        let gray = Style::default().fg(Color::Gray);

        let question = if prompt_open {
            Line::from(vec![
                Span::styled("Restart? ", gray),
                key("Y", Color::Green),
                Span::styled("es / ", gray),
                key("N", Color::Red),
                Span::styled("o", gray),
            ])
        } else {
            Line::from(vec![
                Span::styled("Press ", gray),
                key("R", Color::Green),
                Span::styled(" to restart or ", gray),
                key("Q", Color::Red),
                Span::styled(" to quit", gray),
            ])
        };

        let cause = metrics
            .last_collision
            .map(describe_collision)
            .unwrap_or_default();

        let text = vec![
            Line::from(vec![Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Final Length: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    state.length().to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(Span::styled(cause, gray)),
            Line::from(""),
            question,
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_controls(&self) -> Paragraph<'_> {
        let text = vec![Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" to move | "),
            Span::styled("R", Style::default().fg(Color::Green)),
            Span::raw(" to restart | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" to quit"),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

/// A `width` x `height` box centered in `area`, clipped to it
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{CollisionType, Direction, GameEvent, GameStatus, Snake};
    use ratatui::{Terminal, backend::TestBackend};
    use std::time::Duration;

    fn sample_state() -> GameState {
        GameState::new(
            Snake::new(Position::new(5, 5), Direction::Right, 3),
            Position::new(8, 2),
            vec![Position::new(1, 1)],
            10,
            10,
            Duration::from_millis(150),
        )
    }

    fn draw(state: &GameState, prompt_open: bool) -> String {
        draw_with(state, &GameMetrics::new(), prompt_open)
    }

    fn draw_with(state: &GameState, metrics: &GameMetrics, prompt_open: bool) -> String {
        let mut terminal = Terminal::new(TestBackend::new(60, 24)).unwrap();
        let renderer = Renderer::new();

        terminal
            .draw(|frame| renderer.render(frame, state, metrics, prompt_open))
            .unwrap();

        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_draws_every_entity() {
        let screen = draw(&sample_state(), false);

        assert!(screen.contains("Length: 3"));
        assert!(screen.contains("Tick: 150ms"));
        assert!(screen.contains("Games: 0"));
        assert!(screen.contains('■'));
        assert_eq!(screen.matches('□').count(), 2);
        assert!(screen.contains('@'));
        assert!(screen.contains("██"));
        assert!(!screen.contains("GAME OVER"));
    }

    #[test]
    fn test_game_over_prompt() {
        let mut state = sample_state();
        state.status = GameStatus::GameOver;

        let screen = draw(&state, true);
        assert!(screen.contains("GAME OVER"));
        assert!(screen.contains("Restart?"));

        let screen = draw(&state, false);
        assert!(screen.contains("GAME OVER"));
        assert!(screen.contains("to restart or"));
    }

    #[test]
    fn test_game_over_shows_cause() {
        let mut state = sample_state();
        state.status = GameStatus::GameOver;

        let mut metrics = GameMetrics::new();
        metrics.record(&GameEvent::GameOver {
            collision: CollisionType::Obstacle,
            length: 3,
        });

        let screen = draw_with(&state, &metrics, true);
        assert!(screen.contains("Crashed into an obstacle"));
        assert!(screen.contains("Games: 1"));
        assert!(screen.contains("Best: 3"));
    }

    #[test]
    fn test_centered_rect_clips() {
        let area = Rect::new(0, 0, 20, 5);
        let rect = centered_rect(44, 7, area);
        assert_eq!(rect, area);

        let rect = centered_rect(10, 3, Rect::new(2, 2, 20, 9));
        assert_eq!(rect, Rect::new(7, 5, 10, 3));
    }
}
