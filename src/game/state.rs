use serde::{Deserialize, Serialize};

use super::action::Direction;

/// A position on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
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
}

/// The snake in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at index 0
    pub body: Vec<Position>,
    /// Current direction of movement
    pub direction: Direction,
}

impl Snake {
    /// A single-cell snake
    pub fn new(head: Position, direction: Direction) -> Self {
        Self {
            body: vec![head],
            direction,
        }
    }

    /// Build a snake from explicit segments, head first.
    ///
    /// Panics if `body` is empty.
    pub fn from_body(body: Vec<Position>, direction: Direction) -> Self {
        assert!(!body.is_empty(), "a snake needs at least one segment");
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

    /// True if any segment, head and tail included, sits on `pos`
    pub fn occupies(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// The snake after its head moved to `new_head`.
    ///
    /// Keeps the tail when growing, drops it otherwise.
    pub fn advanced_to(&self, new_head: Position, grow: bool) -> Self {
        let keep = if grow {
            self.body.len()
        } else {
            self.body.len() - 1
        };

        let mut body = Vec::with_capacity(keep + 1);
        body.push(new_head);
        body.extend_from_slice(&self.body[..keep]);

        Self {
            body,
            direction: self.direction,
        }
    }

    /// Same body, new heading
    pub fn turned(&self, direction: Direction) -> Self {
        Self {
            body: self.body.clone(),
            direction,
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

/// Type of collision that occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    /// Snake hit a wall
    Wall,
    /// Snake hit itself
    SelfCollision,
}

/// Coarse lifecycle of a game, independent of the game-over flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GamePhase {
    Idle,
    Running,
    Paused,
}

/// Complete, immutable game snapshot.
///
/// The grid includes a one-cell border; only interior cells
/// (`1..=width-2` by `1..=height-2`) can hold the snake or food.
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    pub food: Position,
    pub grid_width: usize,
    pub grid_height: usize,
    pub phase: GamePhase,
    /// Set by a collision; the board stays frozen until a reset
    pub is_game_over: bool,
}

impl GameState {
    /// Create a new, idle game state
    pub fn new(snake: Snake, food: Position, grid_width: usize, grid_height: usize) -> Self {
        Self {
            snake,
            food,
            grid_width,
            grid_height,
            phase: GamePhase::Idle,
            is_game_over: false,
        }
    }

    pub fn with_phase(mut self, phase: GamePhase) -> Self {
        self.phase = phase;
        self
    }

    pub fn head(&self) -> Position {
        self.snake.head()
    }

    pub fn direction(&self) -> Direction {
        self.snake.direction
    }

    /// Snake length minus the starting segment
    pub fn score(&self) -> usize {
        self.snake.len() - 1
    }

    /// Ticks only advance a running game that has not ended
    pub fn is_ticking(&self) -> bool {
        self.phase == GamePhase::Running && !self.is_game_over
    }

    /// Check if a position is strictly inside the border
    pub fn is_in_interior(&self, pos: Position) -> bool {
        is_interior(pos, self.grid_width, self.grid_height)
    }

    /// Check if a position belongs to the one-cell border
    pub fn is_border(&self, pos: Position) -> bool {
        let max_x = self.grid_width as i32 - 1;
        let max_y = self.grid_height as i32 - 1;
        (0..=max_x).contains(&pos.x)
            && (0..=max_y).contains(&pos.y)
            && (pos.x == 0 || pos.y == 0 || pos.x == max_x || pos.y == max_y)
    }

    /// Check if a position is occupied by the snake
    pub fn is_occupied_by_snake(&self, pos: Position) -> bool {
        self.snake.occupies(pos)
    }
}

/// Interior test shared by snapshots and food placement
pub(crate) fn is_interior(pos: Position, grid_width: usize, grid_height: usize) -> bool {
    pos.x >= 1
        && pos.x <= grid_width as i32 - 2
        && pos.y >= 1
        && pos.y <= grid_height as i32 - 2
}
