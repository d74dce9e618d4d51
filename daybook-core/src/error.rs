//! Error types for daybook.

use thiserror::Error;

/// Errors raised while reading or writing the durable event snapshot.
///
/// The in-memory collection stays authoritative when one of these is
/// returned from a store mutation.
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("Storage IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Stored snapshot has unsupported version {0}")]
    UnsupportedVersion(u32),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Reasons a user-entered event is rejected before it reaches the store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please fill in all required fields ({0} is missing)")]
    MissingField(&'static str),

    #[error("Invalid time '{0}'. Expected HH:MM")]
    InvalidTime(String),

    #[error("End time {end} must be after start time {start}")]
    EndNotAfterStart { start: String, end: String },

    #[error("This event conflicts with an existing event: {name} ({start} - {end})")]
    Conflict {
        name: String,
        start: String,
        end: String,
    },
}

/// Errors loading the daybook configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Configuration error: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Could not write config file: {0}")]
    Io(#[from] std::io::Error),
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

pub type ConfigResult<T> = Result<T, ConfigError>;
