use std::time::Duration;

use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::debug;

use super::{
    config::{ConfigError, GameConfig},
    direction::Direction,
    state::{CollisionType, GameState, GameStatus, Position, Snake},
};

/// Segments this close to the head cannot be reached in a single step,
/// so the self-collision check starts after them.
const SELF_COLLISION_GRACE: usize = 3;

/// Direction every game starts with
pub const START_DIRECTION: Direction = Direction::Right;

/// Something a tick produced that collaborators may react to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// The snake ate the apple and is now `length` segments long
    AteApple { length: usize },
    /// The tick interval shrank to `interval`
    SpeedUp { interval: Duration },
    /// The game ended
    GameOver {
        collision: CollisionType,
        length: usize,
    },
}

/// The simulation engine. Owns all game state; collaborators read it
/// through [`GameEngine::snapshot`] and react to the events of [`GameEngine::tick`].
pub struct GameEngine {
    config: GameConfig,
    rng: StdRng,
    state: GameState,
    pending_direction: Option<Direction>,
}

impl GameEngine {
    /// Create an engine and start its first game.
    ///
    /// The configuration is validated first; nothing after this point can fail.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        Self::from_rng(config, StdRng::from_entropy())
    }

    /// Create an engine whose placements are reproducible
    pub fn with_seed(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::from_rng(config, StdRng::seed_from_u64(seed))
    }

    fn from_rng(config: GameConfig, mut rng: StdRng) -> Result<Self, ConfigError> {
        config.validate()?;
        let state = Self::initial_state(&config, &mut rng);

        Ok(Self {
            config,
            rng,
            state,
            pending_direction: None,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Read-only view of the current game
    pub fn snapshot(&self) -> &GameState {
        &self.state
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    pub fn tick_interval(&self) -> Duration {
        self.state.tick_interval
    }

    /// Throw away the current game and start a fresh one
    pub fn restart(&mut self) {
        self.state = Self::initial_state(&self.config, &mut self.rng);
        self.pending_direction = None;
        debug!(
            apple = ?self.state.apple,
            obstacles = ?self.state.obstacles,
            "game restarted"
        );
    }

    /// Queue a direction for the next tick.
    ///
    /// Requests that would reverse the snake onto its own neck are ignored,
    /// as is any request while the game is over. Returns whether the request
    /// was queued.
    pub fn set_direction(&mut self, requested: Direction) -> bool {
        if !self.state.is_running() || self.state.snake.direction.is_opposite(requested) {
            return false;
        }

        self.pending_direction = Some(requested);
        true
    }

    /// Advance the game by one cell. Does nothing once the game is over.
    pub fn tick(&mut self) -> Vec<GameEvent> {
        if !self.state.is_running() {
            return Vec::new();
        }

        if let Some(direction) = self.pending_direction.take() {
            self.state.snake.direction = direction;
        }

        let new_head = self
            .state
            .snake
            .head()
            .moved_in_direction(self.state.snake.direction);
        self.state.steps += 1;

        if let Some(collision) = self.check_collision(new_head) {
            self.state.status = GameStatus::GameOver;
            let length = self.state.length();
            debug!(?collision, length, steps = self.state.steps, "game over");
            return vec![GameEvent::GameOver { collision, length }];
        }

        let ate_apple = new_head == self.state.apple;
        self.state.snake.advance(ate_apple);

        let mut events = Vec::new();
        if ate_apple {
            self.state.apples_eaten += 1;
            self.state.apple = self.relocate_apple();

            let length = self.state.length();
            debug!(length, apple = ?self.state.apple, "apple eaten");
            events.push(GameEvent::AteApple { length });

            if let Some(interval) = self.speed_up() {
                events.push(GameEvent::SpeedUp { interval });
            }
        }

        events
    }

    /// Check if the new head position ends the game. Checks run in a fixed
    /// order, so a cell holding both an obstacle and the apple is fatal.
    fn check_collision(&self, pos: Position) -> Option<CollisionType> {
        if !self.state.is_in_bounds(pos) {
            return Some(CollisionType::Wall);
        }

        // Checked against the body before it moves, so the tail cell still counts.
        if self.state.snake.occupies_beyond(SELF_COLLISION_GRACE, pos) {
            return Some(CollisionType::SelfCollision);
        }

        if self.state.is_obstacle(pos) {
            return Some(CollisionType::Obstacle);
        }

        None
    }

    /// Shorten the tick interval when the length hits a speed-up multiple
    fn speed_up(&mut self) -> Option<Duration> {
        if self.state.length() % self.config.speedup_every != 0 {
            return None;
        }

        let current = self.state.tick_interval;
        let next = current
            .saturating_sub(self.config.speedup_step())
            .max(self.config.min_tick_interval());

        if next == current {
            return None;
        }

        self.state.tick_interval = next;
        debug!(interval_ms = next.as_millis() as u64, "speed up");
        Some(next)
    }

    /// Pick a new apple cell, different from the one just eaten when the grid allows it
    fn relocate_apple(&mut self) -> Position {
        let previous = self.state.apple;
        let single_cell = self.config.grid_width * self.config.grid_height == 1;

        loop {
            let pos = Self::random_cell(&self.config, &mut self.rng);
            if pos != previous || single_cell {
                return pos;
            }
        }
    }

    fn initial_state(config: &GameConfig, rng: &mut StdRng) -> GameState {
        let snake = Snake::new(
            Position::new(config.start_x, config.start_y),
            START_DIRECTION,
            config.initial_snake_length,
        );

        // Obstacles and apple are placed independently of each other and of the snake.
        let obstacles = (0..config.obstacle_count)
            .map(|_| Self::random_cell(config, rng))
            .collect();
        let apple = Self::random_cell(config, rng);

        GameState::new(
            snake,
            apple,
            obstacles,
            config.grid_width,
            config.grid_height,
            config.base_tick_interval(),
        )
    }

    /// Uniformly random cell on the grid. Validation caps the grid at
    /// `MAX_GRID_SIDE`, so the coordinates fit an `i32`.
    fn random_cell(config: &GameConfig, rng: &mut StdRng) -> Position {
        let x = rng.gen_range(0..config.grid_width) as i32;
        let y = rng.gen_range(0..config.grid_height) as i32;
        Position::new(x, y)
    }
}
