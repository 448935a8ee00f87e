//! Player preferences: an opaque key/value store owned by the host.
//!
//! The clock only ever reads and writes the starting speed.

use crate::{
    error::ClockResult,
    speed::GameSpeed,
};
use std::collections::HashMap;

/// Preference key holding the speed a new session starts at.
pub const STARTING_SPEED_KEY: &str = "game_speed_on_load";

pub trait PlayerPrefs {
    fn get(&self, key: &str) -> ClockResult<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> ClockResult<()>;
}

/// Process-local prefs. Nothing survives the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryPrefs {
    values: HashMap<String, String>,
}

impl MemoryPrefs {
    pub fn new() -> Self { Self::default() }
}

impl PlayerPrefs for MemoryPrefs {
    fn get(&self, key: &str) -> ClockResult<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> ClockResult<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// The persisted starting speed, if the player ever chose one.
/// A stored value that is not a recognized setting is an error.
pub fn load_starting_speed(prefs: &impl PlayerPrefs) -> ClockResult<Option<GameSpeed>> {
    prefs
        .get(STARTING_SPEED_KEY)?
        .map(|raw| raw.parse::<GameSpeed>())
        .transpose()
}

pub fn save_starting_speed(prefs: &mut impl PlayerPrefs, speed: GameSpeed) -> ClockResult<()> {
    prefs.set(STARTING_SPEED_KEY, speed.name())
}
