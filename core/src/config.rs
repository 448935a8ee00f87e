//! Clock configuration.
//!
//! Loaded from a JSON file in production; `ClockConfig::default()` is
//! the configuration tests and the demo runner use.

use crate::{
    calendar::Calendar,
    error::{ClockError, ClockResult},
    speed::GameSpeed,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClockConfig {
    pub starting_year:        u32,
    pub starting_day_of_year: u32,
    pub days_per_year:        u32,
    pub starting_speed:       GameSpeed,
    /// Simulated days credited per real second at `Normal` speed.
    pub days_per_real_second: f64,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            starting_year:        2700,
            starting_day_of_year: 1,
            days_per_year:        365,
            starting_speed:       GameSpeed::Normal,
            days_per_real_second: 1.0,
        }
    }
}

impl ClockConfig {
    /// Load and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {}: {e}", path.display()))?;
        let config: ClockConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ClockResult<()> {
        self.calendar()?;
        if !self.days_per_real_second.is_finite() || self.days_per_real_second <= 0.0 {
            return Err(ClockError::InvalidConfig {
                reason: format!(
                    "days_per_real_second must be positive, got {}",
                    self.days_per_real_second
                ),
            });
        }
        Ok(())
    }

    pub fn calendar(&self) -> ClockResult<Calendar> {
        Calendar::new(self.starting_year, self.starting_day_of_year, self.days_per_year)
    }

    pub fn with_starting_speed(mut self, speed: GameSpeed) -> Self {
        self.starting_speed = speed;
        self
    }
}
