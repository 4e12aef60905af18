use crate::error::EngineError;
use crate::source::check_kind_count;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Configuration for a board and the session played on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Board width in cells.
    pub width: usize,
    /// Board height in cells.
    pub height: usize,
    /// Number of piece kinds in play, taken from the front of `PieceKind::ALL`.
    pub kinds: usize,
    /// Seed for piece generation; `None` draws from OS entropy.
    pub seed: Option<u64>,
    /// Regeneration attempts before giving up on a match-free starting board.
    pub max_generation_attempts: u32,
    /// Time a batch of piece movements is assumed to take.
    pub settle_delay_ms: u64,
    /// Player moves allowed, or unlimited.
    pub move_limit: Option<u32>,
    /// Points that end the game, or none.
    pub point_goal: Option<u32>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            width: 6,
            height: 8,
            kinds: 5,
            seed: None,
            max_generation_attempts: 100_000,
            settle_delay_ms: 300,
            move_limit: None,
            point_goal: None,
        }
    }
}

impl EngineConfig {
    /// Builds a configuration from `MATCH3_*` environment variables, falling
    /// back to the defaults for anything unset.
    pub fn from_env() -> Result<Self, EngineError> {
        let defaults = Self::default();
        let config = Self {
            width: env_or("MATCH3_WIDTH", defaults.width)?,
            height: env_or("MATCH3_HEIGHT", defaults.height)?,
            kinds: env_or("MATCH3_KINDS", defaults.kinds)?,
            seed: env_opt("MATCH3_SEED")?,
            max_generation_attempts: env_or(
                "MATCH3_MAX_ATTEMPTS",
                defaults.max_generation_attempts,
            )?,
            settle_delay_ms: env_or("MATCH3_SETTLE_MS", defaults.settle_delay_ms)?,
            move_limit: env_opt("MATCH3_MOVE_LIMIT")?,
            point_goal: env_opt("MATCH3_POINT_GOAL")?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks dimensions and the kind count.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.width == 0 || self.height == 0 {
            return Err(EngineError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        check_kind_count(self.kinds)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

fn env_or<T: FromStr>(key: &'static str, default: T) -> Result<T, EngineError> {
    Ok(env_opt(key)?.unwrap_or(default))
}

fn env_opt<T: FromStr>(key: &'static str) -> Result<Option<T>, EngineError> {
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| EngineError::InvalidEnv { key, value }),
        Err(_) => Ok(None),
    }
}
