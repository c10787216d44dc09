//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! Snapshots are immutable: every operation hands back a new [`GameState`].

pub mod action;
pub mod config;
pub mod engine;
pub mod error;
pub mod state;

// Re-export commonly used types
pub use action::{Direction, GameEvent, TapPoint};
pub use config::{GameConfig, MAX_GRID_SIDE, SpeedTier};
pub use engine::{GameEngine, StepInfo, StepResult, place_food, turn};
pub use error::GameError;
pub use state::{CollisionType, GamePhase, GameState, Position, Snake};
