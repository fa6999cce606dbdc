//! Error types for the dosing_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for dosing_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Clock time not in HH:MM form
    #[error("Invalid clock time: {0}")]
    InvalidClockTime(String),

    /// Stage period not in "start-end" form
    #[error("Invalid day range: {0}")]
    InvalidDayRange(String),

    /// Schedule requested with no dosage stages
    #[error("Empty stage table")]
    EmptyStageTable,

    /// Generic error
    #[error("{0}")]
    Other(String),
}
