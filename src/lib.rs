//! Tap Snake - a Snake game steered by taps
//!
//! This library provides:
//! - Core game logic (game module)
//! - The live session with its tick loop (session module)
//! - TUI rendering and mouse/keyboard input (render, input modules)
//! - The interactive terminal mode (modes module)

pub mod game;
pub mod input;
pub mod modes;
pub mod render;
pub mod session;
