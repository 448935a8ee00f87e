//! Pause bookkeeping: how much real time has been spent paused.

use crate::types::Seconds;
use serde::{Deserialize, Serialize};

/// Outcome of a pause or resume request.
///
/// Repeated requests are expected from UI and event races, so they are
/// reported back rather than treated as errors.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    Applied,
    AlreadyPaused,
    NotPaused,
}

impl Transition {
    pub fn applied(self) -> bool {
        self == Transition::Applied
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PauseAccumulator {
    session_started_at: Seconds,
    paused:             bool,
    cumulative_paused:  Seconds,
    pause_started_at:   Option<Seconds>,
}

impl PauseAccumulator {
    /// A new accumulator for a session that started, running, at `now`.
    pub fn new(now: Seconds) -> Self {
        Self { session_started_at: now, ..Self::default() }
    }

    pub fn is_paused(&self) -> bool { self.paused }

    /// Total real seconds spent paused in completed pause intervals.
    pub fn cumulative_paused(&self) -> Seconds { self.cumulative_paused }

    pub fn pause(&mut self, now: Seconds) -> Transition {
        if self.paused {
            return Transition::AlreadyPaused;
        }
        self.pause_started_at = Some(now);
        self.paused = true;
        Transition::Applied
    }

    /// Close the current pause interval. Returns the interval length.
    pub fn resume(&mut self, now: Seconds) -> Result<Seconds, Transition> {
        if !self.paused {
            return Err(Transition::NotPaused);
        }
        let started = self.pause_started_at.take().unwrap_or(now);
        let interval = (now - started).max(0.0);
        self.cumulative_paused += interval;
        self.paused = false;
        Ok(interval)
    }

    /// Real time elapsed since the session started with every paused
    /// interval (including the open one) removed. Never negative.
    pub fn real_time_less_time_paused(&self, now: Seconds) -> Seconds {
        let open_interval = match (self.paused, self.pause_started_at) {
            (true, Some(started)) => (now - started).max(0.0),
            _                     => 0.0,
        };
        (now - self.session_started_at - self.cumulative_paused - open_interval).max(0.0)
    }
}
