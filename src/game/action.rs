use serde::{Deserialize, Serialize};

/// Direction the snake can move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Returns true if turning from self to other would be a 180-degree turn
    pub fn is_opposite(&self, other: Direction) -> bool {
        matches!(
            (self, other),
            (Direction::Up, Direction::Down)
                | (Direction::Down, Direction::Up)
                | (Direction::Left, Direction::Right)
                | (Direction::Right, Direction::Left)
        )
    }

    /// Returns true for Up and Down
    pub fn is_vertical(&self) -> bool {
        matches!(self, Direction::Up | Direction::Down)
    }

    /// Returns the delta (dx, dy) for moving in this direction
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

/// A tap on the board canvas, in canvas pixels.
///
/// The canvas is assumed to hold square cells, `canvas_width / grid_width`
/// pixels on a side, with the board origin at (0, 0).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TapPoint {
    pub x: f32,
    pub y: f32,
    pub canvas_width: u32,
}

impl TapPoint {
    pub fn new(x: f32, y: f32, canvas_width: u32) -> Self {
        Self { x, y, canvas_width }
    }
}

/// Everything that can change a game snapshot
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// Start from idle, or resume from pause
    Start,
    Pause,
    /// Throw the current game away and build a fresh one
    Reset,
    /// One timer-driven step of the simulation
    Tick,
    /// Steer towards the tapped cell
    Tap(TapPoint),
}
