use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::action::Direction;
use super::error::GameError;
use super::state::{Position, is_interior};

/// Largest board side the terminal front-end can address
pub const MAX_GRID_SIDE: usize = 512;

/// Tick delay used while the snake is at most `max_length` long
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeedTier {
    pub max_length: usize,
    pub delay_ms: u64,
}

impl SpeedTier {
    pub fn new(max_length: usize, delay_ms: u64) -> Self {
        Self {
            max_length,
            delay_ms,
        }
    }
}

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the game grid, border included
    pub grid_width: usize,
    /// Height of the game grid, border included
    pub grid_height: usize,
    /// Where a fresh snake's head starts
    pub start: Position,
    /// Heading of a fresh snake
    pub initial_direction: Direction,

    // Pacing
    /// Tiers checked in order; the first one that fits the snake wins
    pub speed_tiers: Vec<SpeedTier>,
    /// Delay once the snake outgrows every tier
    pub fallback_delay_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 20,
            grid_height: 30,
            start: Position::new(5, 5),
            initial_direction: Direction::Right,
            speed_tiers: vec![SpeedTier::new(5, 120), SpeedTier::new(10, 110)],
            fallback_delay_ms: 100,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            ..Default::default()
        }
    }

    /// Read a JSON config file; missing fields fall back to the defaults
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the board can host a game
    pub fn validate(&self) -> Result<(), GameError> {
        if self.grid_width < 3 || self.grid_height < 3 {
            return Err(GameError::InvalidConfig(format!(
                "grid {}x{} has no interior; both sides must be at least 3",
                self.grid_width, self.grid_height
            )));
        }

        if self.grid_width > MAX_GRID_SIDE || self.grid_height > MAX_GRID_SIDE {
            return Err(GameError::InvalidConfig(format!(
                "grid {}x{} is too large; sides are capped at {MAX_GRID_SIDE}",
                self.grid_width, self.grid_height
            )));
        }

        if !is_interior(self.start, self.grid_width, self.grid_height) {
            return Err(GameError::InvalidConfig(format!(
                "start cell ({}, {}) is outside the interior of a {}x{} grid",
                self.start.x, self.start.y, self.grid_width, self.grid_height
            )));
        }

        let ascending = self
            .speed_tiers
            .windows(2)
            .all(|pair| pair[0].max_length < pair[1].max_length);
        if !ascending {
            return Err(GameError::InvalidConfig(
                "speed tiers must have strictly increasing max_length".to_string(),
            ));
        }

        Ok(())
    }

    /// Delay before the next tick for a snake of the given length
    pub fn tick_delay(&self, snake_length: usize) -> Duration {
        let delay_ms = self
            .speed_tiers
            .iter()
            .find(|tier| snake_length <= tier.max_length)
            .map(|tier| tier.delay_ms)
            .unwrap_or(self.fallback_delay_ms);
        Duration::from_millis(delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.grid_width, 20);
        assert_eq!(config.grid_height, 30);
        assert_eq!(config.start, Position::new(5, 5));
        assert_eq!(config.initial_direction, Direction::Right);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_custom_config() {
        let config = GameConfig::new(15, 12);
        assert_eq!(config.grid_width, 15);
        assert_eq!(config.grid_height, 12);
        assert_eq!(config.fallback_delay_ms, 100);
    }

    #[test]
    fn test_speed_curve() {
        let config = GameConfig::default();
        assert_eq!(config.tick_delay(1), Duration::from_millis(120));
        assert_eq!(config.tick_delay(5), Duration::from_millis(120));
        assert_eq!(config.tick_delay(6), Duration::from_millis(110));
        assert_eq!(config.tick_delay(10), Duration::from_millis(110));
        assert_eq!(config.tick_delay(11), Duration::from_millis(100));
        assert_eq!(config.tick_delay(400), Duration::from_millis(100));
    }

    #[test]
    fn test_rejects_tiny_grid() {
        let config = GameConfig {
            start: Position::new(1, 1),
            ..GameConfig::new(2, 10)
        };
        assert!(matches!(
            config.validate(),
            Err(GameError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_rejects_oversized_grid() {
        assert!(GameConfig::new(MAX_GRID_SIDE, MAX_GRID_SIDE).validate().is_ok());
        assert!(GameConfig::new(MAX_GRID_SIDE + 1, 30).validate().is_err());
        assert!(GameConfig::new(20, 65_537).validate().is_err());
    }

    #[test]
    fn test_rejects_start_on_border() {
        let config = GameConfig {
            start: Position::new(0, 5),
            ..GameConfig::default()
        };
        assert!(config.validate().is_err());

        // Default start (5, 5) does not fit a 6x6 board's interior (1..=4)
        assert!(GameConfig::new(6, 6).validate().is_err());
    }

    #[test]
    fn test_rejects_unsorted_tiers() {
        let config = GameConfig {
            speed_tiers: vec![SpeedTier::new(10, 110), SpeedTier::new(5, 120)],
            ..GameConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{ "grid_width": 12, "fallback_delay_ms": 80 }}"#).unwrap();

        let config = GameConfig::load(file.path()).unwrap();
        assert_eq!(config.grid_width, 12);
        assert_eq!(config.grid_height, 30);
        assert_eq!(config.fallback_delay_ms, 80);
        assert_eq!(config.speed_tiers.len(), 2);
    }

    #[test]
    fn test_load_rejects_invalid_board() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{ "grid_width": 2 }}"#).unwrap();

        assert!(GameConfig::load(file.path()).is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = GameConfig::load(&dir.path().join("nope.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
