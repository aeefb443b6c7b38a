use std::time::{Duration, Instant};

use crate::game::{CollisionType, GameEvent};

/// Stats for one play session, across restarts
pub struct GameMetrics {
    /// When the current game started
    pub game_started: Instant,
    /// Play time of the current game; frozen once it ends
    pub game_time: Duration,
    pub best_length: usize,
    pub games_played: u32,
    pub apples_eaten: u32,
    /// Sum of final lengths, for the session average
    length_total: usize,
    /// What ended the most recent game
    pub last_collision: Option<CollisionType>,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            game_started: Instant::now(),
            game_time: Duration::ZERO,
            best_length: 0,
            games_played: 0,
            apples_eaten: 0,
            length_total: 0,
            last_collision: None,
        }
    }

    /// Refresh the game clock while the game runs
    pub fn update(&mut self, running: bool) {
        if running {
            self.game_time = self.game_started.elapsed();
        }
    }

    pub fn on_game_start(&mut self) {
        self.game_started = Instant::now();
        self.game_time = Duration::ZERO;
        self.last_collision = None;
    }

    /// Fold one engine event into the session
    pub fn record(&mut self, event: &GameEvent) {
        match *event {
            GameEvent::AteApple { .. } => self.apples_eaten += 1,
            GameEvent::GameOver { collision, length } => {
                self.games_played += 1;
                self.length_total += length;
                self.best_length = self.best_length.max(length);
                self.last_collision = Some(collision);
            }
            GameEvent::SpeedUp { .. } => {}
        }
    }

    /// Mean final length over finished games
    pub fn average_length(&self) -> Option<f64> {
        (self.games_played > 0).then(|| self.length_total as f64 / f64::from(self.games_played))
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.game_time.as_secs();
        format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Short phrase for what ended a game
pub fn describe_collision(collision: CollisionType) -> &'static str {
    match collision {
        CollisionType::Wall => "Hit the wall",
        CollisionType::SelfCollision => "Bit your own tail",
        CollisionType::Obstacle => "Crashed into an obstacle",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn over(collision: CollisionType, length: usize) -> GameEvent {
        GameEvent::GameOver { collision, length }
    }

    #[test]
    fn test_time_formatting() {
        let mut metrics = GameMetrics::new();
        metrics.game_time = Duration::from_secs(125);
        assert_eq!(metrics.format_time(), "02:05");

        metrics.game_time = Duration::from_secs(0);
        assert_eq!(metrics.format_time(), "00:00");

        metrics.game_time = Duration::from_secs(3661);
        assert_eq!(metrics.format_time(), "61:01");
    }

    #[test]
    fn test_session_totals() {
        let mut metrics = GameMetrics::new();
        assert_eq!(metrics.average_length(), None);

        metrics.record(&GameEvent::AteApple { length: 4 });
        metrics.record(&GameEvent::SpeedUp {
            interval: Duration::from_millis(140),
        });
        metrics.record(&over(CollisionType::Wall, 10));
        metrics.record(&over(CollisionType::Obstacle, 5));

        assert_eq!(metrics.apples_eaten, 1);
        assert_eq!(metrics.games_played, 2);
        assert_eq!(metrics.best_length, 10);
        assert_eq!(metrics.average_length(), Some(7.5));
        assert_eq!(metrics.last_collision, Some(CollisionType::Obstacle));

        metrics.record(&over(CollisionType::SelfCollision, 15));
        assert_eq!(metrics.best_length, 15);
    }

    #[test]
    fn test_new_game_clears_last_collision() {
        let mut metrics = GameMetrics::new();
        metrics.record(&over(CollisionType::Wall, 3));
        metrics.on_game_start();

        assert_eq!(metrics.last_collision, None);
        assert_eq!(metrics.games_played, 1);
    }

    #[test]
    fn test_clock_freezes_after_game_over() {
        let mut metrics = GameMetrics::new();
        metrics.game_time = Duration::from_secs(42);
        metrics.update(false);
        assert_eq!(metrics.game_time, Duration::from_secs(42));
    }

    #[test]
    fn test_collision_phrases() {
        assert_eq!(describe_collision(CollisionType::Wall), "Hit the wall");
        assert_eq!(
            describe_collision(CollisionType::Obstacle),
            "Crashed into an obstacle"
        );
    }
}
