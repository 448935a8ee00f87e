//! Game speed settings and the controller holding the active one.

use crate::error::{ClockError, ClockResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Every selectable simulation speed, slowest first.
/// NEVER reorder. Ordinals are persisted in player prefs and IPC payloads.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum GameSpeed {
    Slowest = 0,
    Slow    = 1,
    #[default]
    Normal  = 2,
    Fast    = 3,
    Fastest = 4,
}

impl GameSpeed {
    pub const ALL: [GameSpeed; 5] = [
        GameSpeed::Slowest,
        GameSpeed::Slow,
        GameSpeed::Normal,
        GameSpeed::Fast,
        GameSpeed::Fastest,
    ];

    /// Factor applied to real elapsed time. `Normal` is exactly 1.0.
    pub fn multiplier(self) -> f64 {
        match self {
            GameSpeed::Slowest => 0.25,
            GameSpeed::Slow    => 0.5,
            GameSpeed::Normal  => 1.0,
            GameSpeed::Fast    => 2.0,
            GameSpeed::Fastest => 4.0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            GameSpeed::Slowest => "slowest",
            GameSpeed::Slow    => "slow",
            GameSpeed::Normal  => "normal",
            GameSpeed::Fast    => "fast",
            GameSpeed::Fastest => "fastest",
        }
    }

    /// Next faster setting, or `None` at `Fastest`.
    pub fn faster(self) -> Option<GameSpeed> {
        Self::ALL.get(self as usize + 1).copied()
    }

    /// Next slower setting, or `None` at `Slowest`.
    pub fn slower(self) -> Option<GameSpeed> {
        (self as usize).checked_sub(1).and_then(|i| Self::ALL.get(i).copied())
    }
}

impl fmt::Display for GameSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<u8> for GameSpeed {
    type Error = ClockError;

    fn try_from(ordinal: u8) -> ClockResult<Self> {
        Self::ALL
            .get(ordinal as usize)
            .copied()
            .ok_or_else(|| ClockError::UnrecognizedSpeedSetting { value: ordinal.to_string() })
    }
}

/// Accepts a setting name (any case) or its ordinal.
impl FromStr for GameSpeed {
    type Err = ClockError;

    fn from_str(raw: &str) -> ClockResult<Self> {
        let trimmed = raw.trim();
        if let Ok(ordinal) = trimmed.parse::<u8>() {
            return GameSpeed::try_from(ordinal);
        }
        Self::ALL
            .iter()
            .copied()
            .find(|s| s.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ClockError::UnrecognizedSpeedSetting { value: raw.to_string() })
    }
}

/// Holds the active speed. Flushing elapsed time before a swap is the
/// caller's job (see `GameClock::set_speed`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeedController {
    current: GameSpeed,
}

impl SpeedController {
    pub fn new(initial: GameSpeed) -> Self {
        Self { current: initial }
    }

    pub fn current(&self) -> GameSpeed { self.current }

    pub fn current_multiplier(&self) -> f64 {
        self.current.multiplier()
    }

    /// Swap to `speed`. Returns the previous setting, or `None` if
    /// `speed` was already active.
    pub fn swap(&mut self, speed: GameSpeed) -> Option<GameSpeed> {
        if speed == self.current {
            return None;
        }
        Some(std::mem::replace(&mut self.current, speed))
    }

    /// The setting one step faster, saturating at `Fastest`.
    pub fn step_up(&self) -> GameSpeed {
        self.current.faster().unwrap_or(self.current)
    }

    /// The setting one step slower, saturating at `Slowest`.
    pub fn step_down(&self) -> GameSpeed {
        self.current.slower().unwrap_or(self.current)
    }
}
