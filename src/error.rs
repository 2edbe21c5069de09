//! Error types
//!
//! Only level loading and the on-disk store can fail. The simulation itself
//! never returns errors.

use thiserror::Error;

/// Failure to build a playable level from chart data
#[derive(Debug, Error, PartialEq)]
pub enum LevelError {
    /// Chart had no usable rows
    #[error("chart contains no samples")]
    Empty,

    /// A chart row could not be parsed
    #[error("malformed chart row {line}: {reason}")]
    Malformed { line: usize, reason: String },

    /// A sample was NaN or infinite
    #[error("sample {index} is not a finite point")]
    NonFinite { index: usize },

    /// Not enough segments to fill both window buffers
    #[error("level too short: {segments} segments, need more than {required}")]
    TooShort { segments: usize, required: usize },
}

/// Failure reading or writing game files
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown level: {0}")]
    UnknownLevel(String),

    #[error("level error: {0}")]
    Level(#[from] LevelError),
}
