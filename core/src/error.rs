use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClockError {
    #[error("Unrecognized speed setting: '{value}'")]
    UnrecognizedSpeedSetting { value: String },

    #[error("Invalid calendar: {reason}")]
    InvalidCalendar { reason: String },

    #[error("Invalid config: {reason}")]
    InvalidConfig { reason: String },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Clock lock poisoned by a panicking holder")]
    LockPoisoned,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type ClockResult<T> = Result<T, ClockError>;
