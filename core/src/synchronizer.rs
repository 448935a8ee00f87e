//! The simulated-day accumulator.
//!
//! RULE: `accumulated_days` changes only inside `sync()`, and only by
//! `multiplier × days_per_real_second × (now − last_sync)`.
//! Nothing ticks it behind the scenes; it advances when someone asks.

use crate::types::{Seconds, SimDays};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClockSynchronizer {
    accumulated_days:     SimDays,
    last_sync:            Seconds,
    days_per_real_second: f64,
}

impl ClockSynchronizer {
    pub fn new(now: Seconds, days_per_real_second: f64) -> Self {
        Self::resume_from(0.0, now, days_per_real_second)
    }

    /// Continue from a previously accumulated total.
    pub fn resume_from(accumulated_days: SimDays, now: Seconds, days_per_real_second: f64) -> Self {
        Self {
            accumulated_days: accumulated_days.max(0.0),
            last_sync: now,
            days_per_real_second,
        }
    }

    /// Credit the real time since the last sync at `multiplier`.
    /// A paused clock has nothing to credit. Returns the days added.
    pub fn sync(&mut self, now: Seconds, multiplier: f64, paused: bool) -> SimDays {
        if paused {
            return 0.0;
        }
        let elapsed = now - self.last_sync;
        if elapsed < 0.0 {
            log::warn!(
                "real time went backward ({:.6}s -> {:.6}s); holding simulated clock",
                self.last_sync,
                now
            );
            self.last_sync = now;
            return 0.0;
        }
        let added = elapsed * self.days_per_real_second * multiplier;
        self.accumulated_days += added;
        self.last_sync = now;
        added
    }

    /// Move the sync point without crediting anything. Used after a
    /// resume or a speed swap so the skipped interval is never counted.
    pub fn reset_sync_point(&mut self, now: Seconds) {
        self.last_sync = now;
    }

    /// The accumulator as of the last sync. Callers wanting a fresh
    /// value go through `GameClock::accumulated_days`.
    pub fn accumulated_days(&self) -> SimDays { self.accumulated_days }
}
