//! Simulation configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use skirmish_logic::combat::DEFAULT_POWER_DIE;
use skirmish_logic::FieldBounds;

use crate::error::ConfigError;

/// Static configuration for a simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Width of the field; valid x is `0..field_width`.
    pub field_width: i32,
    /// Height of the field; valid y is `0..field_height`.
    pub field_height: i32,
    /// Number of NPCs generated for a fresh run.
    pub population: usize,
    /// Wall-clock budget of the running phase, in seconds.
    pub duration_secs: f64,
    /// Mover tick interval (and frame interval), in milliseconds.
    pub tick_millis: u64,
    /// Sides of the power die rolled by both fighters.
    pub power_die: u32,
    /// Where the default kill log is appended.
    pub log_path: PathBuf,
    /// Optional RNG seed. Threads still interleave nondeterministically.
    pub rng_seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            field_width: 100,
            field_height: 100,
            population: 50,
            duration_secs: 30.0,
            tick_millis: 1000,
            power_die: DEFAULT_POWER_DIE,
            log_path: PathBuf::from("log.txt"),
            rng_seed: None,
        }
    }
}

impl SimConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.field_width <= 0 || self.field_height <= 0 {
            return Err(ConfigError::Invalid("field dimensions must be positive"));
        }
        if self.power_die == 0 {
            return Err(ConfigError::Invalid("power_die must be at least 1"));
        }
        if self.tick_millis == 0 {
            return Err(ConfigError::Invalid("tick_millis must be non-zero"));
        }
        if !self.duration_secs.is_finite() || self.duration_secs < 0.0 {
            return Err(ConfigError::Invalid("duration_secs must be finite and non-negative"));
        }
        Ok(())
    }

    pub fn bounds(&self) -> FieldBounds {
        FieldBounds::new(self.field_width, self.field_height)
    }

    pub fn duration(&self) -> Duration {
        Duration::try_from_secs_f64(self.duration_secs).unwrap_or(Duration::ZERO)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_millis)
    }
}
