//! starclock-core: the authoritative game clock for a space-strategy
//! session.
//!
//! Real time flows one way: `real_time` → `clock` (gated by `pause`,
//! scaled by `speed`, accumulated by `synchronizer`) → `calendar`.

pub mod calendar;
pub mod clock;
pub mod command;
pub mod config;
pub mod error;
pub mod event;
pub mod pause;
pub mod prefs;
pub mod real_time;
pub mod shared;
pub mod snapshot;
pub mod speed;
pub mod store;
pub mod synchronizer;
pub mod types;
