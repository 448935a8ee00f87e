//! Snapshot serialization: clock state to/from JSON.
//!
//! A snapshot captures everything needed to continue a session's
//! calendar in a later process. Real-time readings are not captured;
//! they are meaningless outside the process that took them.

use crate::{
    calendar::GameDate,
    speed::GameSpeed,
    types::{SessionId, SimDays},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClockSnapshot {
    pub session_id:       SessionId,
    pub accumulated_days: SimDays,
    pub speed:            GameSpeed,
    pub paused:           bool,
    /// Derived; kept for readers that only want the date.
    pub date:             GameDate,
}
