//! Shared primitive types used across the entire clock.

/// Real (wall-clock) seconds since the session's time source started.
pub type Seconds = f64;

/// Simulated days. One simulated day is one calendar day of game time.
pub type SimDays = f64;

/// The canonical game-session identifier.
pub type SessionId = String;
