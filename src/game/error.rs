//! Error types for the game core.

/// Failures the game core can detect.
///
/// Collisions are not errors; they end the game through
/// [`GameState::is_game_over`](super::GameState::is_game_over).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("no free interior cell left for food on a {width}x{height} board")]
    BoardExhausted { width: usize, height: usize },

    #[error("invalid game config: {0}")]
    InvalidConfig(String),
}
