use std::collections::VecDeque;
use std::time::Duration;

use super::direction::Direction;

/// A position on the game grid, in whole cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }

    /// Top-left pixel of this cell on a canvas with the given grid pitch
    pub fn to_pixels(&self, cell_size: u32) -> (i64, i64) {
        let pitch = i64::from(cell_size);
        (i64::from(self.x) * pitch, i64::from(self.y) * pitch)
    }
}

/// The snake in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at the front
    body: VecDeque<Position>,
    /// Direction applied on the most recent move
    pub direction: Direction,
}

impl Snake {
    /// Create a new snake with given starting position and direction
    pub fn new(head: Position, direction: Direction, length: usize) -> Self {
        let (dx, dy) = direction.delta();
        let mut body = VecDeque::with_capacity(length.max(1));
        let mut segment = head;
        for _ in 0..length.max(1) {
            body.push_back(segment);
            segment = segment.moved_by(-dx, -dy);
        }

        Self { body, direction }
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Get the tail position (last segment)
    pub fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    /// All segments, head first
    pub fn segments(&self) -> impl ExactSizeIterator<Item = Position> + '_ {
        self.body.iter().copied()
    }

    /// Segments excluding the head
    pub fn body_segments(&self) -> impl Iterator<Item = Position> + '_ {
        self.segments().skip(1)
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Check if `pos` is occupied by any segment at index `skip` or further from the head
    pub fn occupies_beyond(&self, skip: usize, pos: Position) -> bool {
        self.segments().skip(skip).any(|segment| segment == pos)
    }

    /// Push a new head one cell ahead. The tail cell is released unless `grow` is set.
    pub fn advance(&mut self, grow: bool) {
        let new_head = self.head().moved_in_direction(self.direction);
        self.body.push_front(new_head);

        if !grow {
            self.body.pop_back();
        }
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Check if the snake is empty (should never happen in practice)
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Type of collision that ended a game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    /// Snake left the grid
    Wall,
    /// Snake hit itself
    SelfCollision,
    /// Snake hit an obstacle cell
    Obstacle,
}

/// Whether the engine is still advancing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Running,
    GameOver,
}

/// Complete game state, handed to collaborators read-only
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    pub apple: Position,
    pub obstacles: Vec<Position>,
    pub grid_width: usize,
    pub grid_height: usize,
    pub status: GameStatus,
    /// Current period between ticks
    pub tick_interval: Duration,
    pub apples_eaten: u32,
    pub steps: u32,
}

impl GameState {
    /// Create a new running game state
    pub fn new(
        snake: Snake,
        apple: Position,
        obstacles: Vec<Position>,
        grid_width: usize,
        grid_height: usize,
        tick_interval: Duration,
    ) -> Self {
        Self {
            snake,
            apple,
            obstacles,
            grid_width,
            grid_height,
            status: GameStatus::Running,
            tick_interval,
            apples_eaten: 0,
            steps: 0,
        }
    }

    /// Check if a position is within the grid bounds
    pub fn is_in_bounds(&self, pos: Position) -> bool {
        usize::try_from(pos.x).is_ok_and(|x| x < self.grid_width)
            && usize::try_from(pos.y).is_ok_and(|y| y < self.grid_height)
    }

    pub fn is_obstacle(&self, pos: Position) -> bool {
        self.obstacles.contains(&pos)
    }

    pub fn is_running(&self) -> bool {
        self.status == GameStatus::Running
    }

    /// Snake length, the game's only score
    pub fn length(&self) -> usize {
        self.snake.len()
    }
}
