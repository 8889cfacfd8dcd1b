use std::time::Duration;

use thiserror::Error;

use crate::GridInt;

pub const MIN_GRID_SIDE: GridInt = 3;
/// Keeps a drawn board, two columns per cell plus borders, inside a `u16`.
pub const MAX_GRID_SIDE: GridInt = 1000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("grid must be at least {min}x{min}, got {width}x{height}", min = MIN_GRID_SIDE)]
    GridTooSmall { width: GridInt, height: GridInt },
    #[error("grid must be at most {max}x{max}, got {width}x{height}", max = MAX_GRID_SIDE)]
    GridTooLarge { width: GridInt, height: GridInt },
    #[error("speed must be at least one tick per second")]
    ZeroSpeed,
    #[error("frame rate must be at least one frame per second")]
    ZeroFps,
    #[error("username must be non-empty and contain no ':' or line breaks")]
    InvalidUsername,
}

/// Accepts names that survive a round trip through the `name:score` file.
pub fn parse_username(name: &str) -> Result<String, ConfigError> {
    if name.is_empty() || name.contains(|c: char| matches!(c, ':' | '\n' | '\r')) {
        return Err(ConfigError::InvalidUsername);
    }
    Ok(name.to_string())
}

/// How `Game::on_tick` consumes an elapsed time longer than one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TickPolicy {
    /// At most one tick per call; the surplus stays in the accumulator.
    #[default]
    SingleStep,
    /// Run as many ticks as the accumulated time covers.
    CatchUp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    pub width: GridInt,
    pub height: GridInt,
    /// Ticks per second.
    pub speed: u32,
    pub tick_policy: TickPolicy,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: 12,
            height: 9,
            speed: 5,
            tick_policy: TickPolicy::SingleStep,
        }
    }
}

impl GameConfig {
    pub fn new(width: GridInt, height: GridInt) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width < MIN_GRID_SIDE || self.height < MIN_GRID_SIDE {
            return Err(ConfigError::GridTooSmall { width: self.width, height: self.height });
        }
        if self.width > MAX_GRID_SIDE || self.height > MAX_GRID_SIDE {
            return Err(ConfigError::GridTooLarge { width: self.width, height: self.height });
        }
        if self.speed == 0 {
            return Err(ConfigError::ZeroSpeed);
        }
        Ok(())
    }

    /// Only meaningful once `validate` passed.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(1) / self.speed.max(1)
    }
}
