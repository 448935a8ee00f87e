//! Calendar derivation: simulated days to (year, day-of-year).
//!
//! The date is never stored as authoritative state. It is recomputed
//! from the accumulated simulated days every time someone reads it.

use crate::error::{ClockError, ClockResult};
use crate::types::SimDays;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A calendar date. Field order gives chronological ordering.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GameDate {
    pub year:        u32,
    /// 1-based.
    pub day_of_year: u32,
}

impl GameDate {
    pub fn new(year: u32, day_of_year: u32) -> Self {
        Self { year, day_of_year }
    }
}

impl fmt::Display for GameDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:03}", self.year, self.day_of_year)
    }
}

/// Map accumulated simulated days onto the calendar.
///
/// Only whole days count; a partially elapsed day still reads as the
/// day it started on. Negative or non-finite inputs are treated as 0.
pub fn derive_date(
    accumulated_days: SimDays,
    epoch_year: u32,
    epoch_day_of_year: u32,
    days_per_year: u32,
) -> GameDate {
    let whole_days = if accumulated_days.is_finite() && accumulated_days > 0.0 {
        accumulated_days.floor() as u64
    } else {
        0
    };
    let days_per_year = u64::from(days_per_year.max(1));
    let total = u64::from(epoch_day_of_year.saturating_sub(1)) + whole_days;
    let years_elapsed = total / days_per_year;
    GameDate {
        year:        epoch_year.saturating_add(u32::try_from(years_elapsed).unwrap_or(u32::MAX)),
        day_of_year: (total % days_per_year) as u32 + 1,
    }
}

/// A validated epoch plus year length.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Calendar {
    epoch:         GameDate,
    days_per_year: u32,
}

impl Calendar {
    pub fn new(epoch_year: u32, epoch_day_of_year: u32, days_per_year: u32) -> ClockResult<Self> {
        if days_per_year == 0 {
            return Err(ClockError::InvalidCalendar {
                reason: "days_per_year must be at least 1".into(),
            });
        }
        if epoch_day_of_year == 0 || epoch_day_of_year > days_per_year {
            return Err(ClockError::InvalidCalendar {
                reason: format!(
                    "epoch day {epoch_day_of_year} outside 1..={days_per_year}"
                ),
            });
        }
        Ok(Self {
            epoch: GameDate::new(epoch_year, epoch_day_of_year),
            days_per_year,
        })
    }

    pub fn epoch(&self) -> GameDate { self.epoch }

    pub fn days_per_year(&self) -> u32 { self.days_per_year }

    pub fn date_at(&self, accumulated_days: SimDays) -> GameDate {
        derive_date(
            accumulated_days,
            self.epoch.year,
            self.epoch.day_of_year,
            self.days_per_year,
        )
    }

}
