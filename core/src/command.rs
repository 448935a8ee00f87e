use serde::{Deserialize, Serialize};
use crate::speed::GameSpeed;

/// All player-issued clock commands.
/// Variants are append-only.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum ClockCommand {
    // ── Pause control ─────────────────────────────
    Pause,
    Resume,
    TogglePause,

    // ── Speed control ─────────────────────────────
    SetSpeed { speed: GameSpeed },
    SpeedUp,
    SlowDown,
}

impl ClockCommand {
    /// Stable name, used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            ClockCommand::Pause            => "pause",
            ClockCommand::Resume           => "resume",
            ClockCommand::TogglePause      => "toggle_pause",
            ClockCommand::SetSpeed { .. }  => "set_speed",
            ClockCommand::SpeedUp          => "speed_up",
            ClockCommand::SlowDown         => "slow_down",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tagged_json() {
        let cmd: ClockCommand = serde_json::from_str(r#"{"cmd":"set_speed","speed":"fastest"}"#).unwrap();
        assert_eq!(cmd, ClockCommand::SetSpeed { speed: GameSpeed::Fastest });

        let cmd: ClockCommand = serde_json::from_str(r#"{"cmd":"toggle_pause"}"#).unwrap();
        assert_eq!(cmd.name(), "toggle_pause");
    }

    #[test]
    fn unknown_speed_in_payload_is_rejected() {
        let parsed = serde_json::from_str::<ClockCommand>(r#"{"cmd":"set_speed","speed":"warp"}"#);
        assert!(parsed.is_err());
    }
}
