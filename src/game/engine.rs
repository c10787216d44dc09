use std::collections::HashSet;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use super::{
    Direction,
    action::{GameEvent, TapPoint},
    config::GameConfig,
    error::GameError,
    state::{CollisionType, GamePhase, GameState, Position, Snake, is_interior},
};

/// Information about a step
#[derive(Debug, Clone, PartialEq)]
pub struct StepInfo {
    /// Whether the snake ate food this step
    pub ate_food: bool,
    /// Type of collision if one occurred
    pub collision_type: Option<CollisionType>,
}

/// Result of a game step
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// The snapshot after the step
    pub state: GameState,
    /// Additional information about the step
    pub info: StepInfo,
}

/// The game engine that handles all game logic.
///
/// Every operation takes a snapshot and returns a new one; the engine
/// itself only owns the configuration and the food RNG.
pub struct GameEngine {
    config: GameConfig,
    rng: StdRng,
}

impl GameEngine {
    /// Create a new game engine with the given configuration
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            rng: StdRng::from_entropy(),
        }
    }

    /// Engine whose food placement is reproducible
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Fresh idle game: single-cell snake at the start cell, random food
    pub fn new_game(&mut self) -> Result<GameState, GameError> {
        let snake = Snake::new(self.config.start, self.config.initial_direction);
        let food = place_food(
            &mut self.rng,
            &snake.body,
            self.config.grid_width,
            self.config.grid_height,
        )?;

        Ok(GameState::new(
            snake,
            food,
            self.config.grid_width,
            self.config.grid_height,
        ))
    }

    /// Apply any event to a snapshot.
    ///
    /// Phase events follow the Idle/Running/Paused table, ticks and taps
    /// only act on a running game that has not ended.
    pub fn apply(&mut self, state: &GameState, event: GameEvent) -> Result<GameState, GameError> {
        match event {
            GameEvent::Start => {
                if state.is_game_over || state.phase == GamePhase::Running {
                    return Ok(state.clone());
                }
                info!(from = ?state.phase, "game running");
                Ok(state.clone().with_phase(GamePhase::Running))
            }
            GameEvent::Pause => {
                if state.is_game_over || state.phase != GamePhase::Running {
                    return Ok(state.clone());
                }
                info!(score = state.score(), "game paused");
                Ok(state.clone().with_phase(GamePhase::Paused))
            }
            GameEvent::Reset => {
                info!(
                    score = state.score(),
                    was_over = state.is_game_over,
                    "game reset"
                );
                self.new_game()
            }
            GameEvent::Tick => {
                if !state.is_ticking() {
                    return Ok(state.clone());
                }
                self.advance(state)
            }
            GameEvent::Tap(tap) => {
                if !state.is_ticking() {
                    return Ok(state.clone());
                }
                Ok(turn(state, tap))
            }
        }
    }

    /// Move the snake one cell; the game-over snapshot is returned as-is
    pub fn advance(&mut self, state: &GameState) -> Result<GameState, GameError> {
        self.step(state).map(|result| result.state)
    }

    /// Execute one step of the game
    pub fn step(&mut self, state: &GameState) -> Result<StepResult, GameError> {
        if state.is_game_over {
            return Ok(StepResult {
                state: state.clone(),
                info: StepInfo {
                    ate_food: false,
                    collision_type: None,
                },
            });
        }

        // Calculate new head position
        let new_head = state.head().moved_in_direction(state.direction());

        // Check for collisions against the pre-move body, tail included
        if let Some(collision_type) = check_collision(state, new_head) {
            info!(?collision_type, score = state.score(), "game over");

            let mut over = state.clone();
            over.is_game_over = true;
            return Ok(StepResult {
                state: over,
                info: StepInfo {
                    ate_food: false,
                    collision_type: Some(collision_type),
                },
            });
        }

        // Check if snake ate food
        let ate_food = new_head == state.food;

        // Move snake (grow if ate food)
        let snake = state.snake.advanced_to(new_head, ate_food);

        let food = if ate_food {
            let food = place_food(&mut self.rng, &snake.body, state.grid_width, state.grid_height)?;
            info!(length = snake.len(), ?food, "food eaten");
            food
        } else {
            state.food
        };

        debug!(?new_head, length = snake.len(), "tick");

        Ok(StepResult {
            state: GameState {
                snake,
                food,
                ..state.clone()
            },
            info: StepInfo {
                ate_food,
                collision_type: None,
            },
        })
    }

    /// Delay before the tick that follows `state`
    pub fn tick_delay(&self, state: &GameState) -> Duration {
        self.config.tick_delay(state.snake.len())
    }
}

/// Steer towards a tapped cell, always turning 90 degrees.
///
/// A vertical heading becomes Left/Right depending on which side of the
/// head the tap lands, a horizontal heading becomes Up/Down. Taps on a
/// finished game, or on a canvas too narrow to hold a pixel per cell,
/// change nothing.
pub fn turn(state: &GameState, tap: TapPoint) -> GameState {
    if state.is_game_over {
        return state.clone();
    }

    let cell_size = tap.canvas_width / state.grid_width as u32;
    if cell_size == 0 {
        debug!(canvas_width = tap.canvas_width, "tap ignored on degenerate canvas");
        return state.clone();
    }

    let tap_x = (tap.x / cell_size as f32).floor() as i32;
    let tap_y = (tap.y / cell_size as f32).floor() as i32;
    let head = state.head();

    let direction = if state.direction().is_vertical() {
        if tap_x < head.x {
            Direction::Left
        } else {
            Direction::Right
        }
    } else if tap_y < head.y {
        Direction::Up
    } else {
        Direction::Down
    };

    debug!(from = ?state.direction(), to = ?direction, tap_x, tap_y, "turn");

    GameState {
        snake: state.snake.turned(direction),
        ..state.clone()
    }
}

/// Pick a free interior cell uniformly at random.
///
/// Fails with [`GameError::BoardExhausted`] when every interior cell is in
/// `occupied`.
pub fn place_food<R: Rng + ?Sized>(
    rng: &mut R,
    occupied: &[Position],
    grid_width: usize,
    grid_height: usize,
) -> Result<Position, GameError> {
    let occupied: HashSet<Position> = occupied.iter().copied().collect();

    let free: Vec<Position> = (1..grid_height as i32 - 1)
        .flat_map(|y| (1..grid_width as i32 - 1).map(move |x| Position::new(x, y)))
        .filter(|pos| !occupied.contains(pos))
        .collect();

    free.choose(rng)
        .copied()
        .ok_or(GameError::BoardExhausted {
            width: grid_width,
            height: grid_height,
        })
}

/// Check if the new head position causes a collision
fn check_collision(state: &GameState, pos: Position) -> Option<CollisionType> {
    // Self first, then walls
    if state.is_occupied_by_snake(pos) {
        return Some(CollisionType::SelfCollision);
    }

    if !is_interior(pos, state.grid_width, state.grid_height) {
        return Some(CollisionType::Wall);
    }

    None
}
