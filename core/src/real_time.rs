//! Real-time sources: the only place the clock reads wall-clock time.
//!
//! RULE: Nothing else in the crate reads the host's time facility.
//! Everything downstream sees time as `Seconds` handed out by a
//! `RealTimeSource`, so tests can drive time by hand.

use crate::types::Seconds;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Monotonic wall-clock seconds since a fixed, source-specific epoch.
pub trait RealTimeSource: Send + Sync {
    fn now(&self) -> Seconds;
}

/// Production source backed by `std::time::Instant`.
/// Its epoch is the moment it was created.
#[derive(Debug, Clone, Copy)]
pub struct SystemTimeSource {
    started: Instant,
}

impl SystemTimeSource {
    pub fn new() -> Self {
        Self { started: Instant::now() }
    }
}

impl Default for SystemTimeSource {
    fn default() -> Self { Self::new() }
}

impl RealTimeSource for SystemTimeSource {
    fn now(&self) -> Seconds {
        self.started.elapsed().as_secs_f64()
    }
}

/// A source that only moves when told to.
///
/// Clones share the same reading, so a test can keep one handle and
/// give another to the clock.
#[derive(Debug, Clone, Default)]
pub struct ManualTimeSource {
    bits: Arc<AtomicU64>,
}

impl ManualTimeSource {
    pub fn new(start: Seconds) -> Self {
        Self { bits: Arc::new(AtomicU64::new(start.to_bits())) }
    }

    /// Move time forward by `seconds`. Negative or non-finite amounts are ignored.
    pub fn advance(&self, seconds: Seconds) {
        if !seconds.is_finite() || seconds <= 0.0 {
            return;
        }
        // The closure always returns `Some`, so the update cannot fail.
        self.bits
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |bits| {
                Some((f64::from_bits(bits) + seconds).to_bits())
            })
            .ok();
    }
}

impl RealTimeSource for ManualTimeSource {
    fn now(&self) -> Seconds {
        f64::from_bits(self.bits.load(Ordering::SeqCst))
    }
}

/// Tracks frame boundaries to produce a per-frame delta.
#[derive(Debug, Clone, Default)]
pub struct FrameTimer {
    last_boundary: Option<Seconds>,
    delta:         Seconds,
}

impl FrameTimer {
    pub fn new() -> Self { Self::default() }

    /// Record a frame boundary at `now` and return the delta since the
    /// previous one. The first boundary yields 0.
    pub fn mark(&mut self, now: Seconds) -> Seconds {
        self.delta = match self.last_boundary {
            Some(prev) => (now - prev).max(0.0),
            None       => 0.0,
        };
        self.last_boundary = Some(now);
        self.delta
    }

    /// Delta measured at the most recent boundary.
    pub fn delta(&self) -> Seconds {
        self.delta
    }
}
