//! Core error types for jogplan-core.
//!
//! "No slot found" is not an error: search functions return `Ok(None)`.
//! These types cover precondition violations, configuration problems and
//! failures reported by calendar capabilities.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Core error type for jogplan-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Calendar capability errors
    #[error("Calendar error: {0}")]
    Calendar(#[from] CalendarError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown dot-path key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Config directory could not be prepared
    #[error("Config directory unavailable: {0}")]
    DirUnavailable(String),
}

/// Errors reported by calendar read/write capabilities.
#[derive(Error, Debug)]
pub enum CalendarError {
    /// The user has not granted calendar access
    #[error("Calendar access is not granted")]
    AccessDenied,

    /// No event with the given identifier exists
    #[error("Calendar event not found: {0}")]
    EventNotFound(String),

    /// The backing store failed
    #[error("Calendar store failure: {0}")]
    Store(String),
}

/// Validation errors.
#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    /// Invalid time range
    #[error("Invalid time range: end_time ({end}) must be greater than start_time ({start})")]
    InvalidTimeRange {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    /// Duration must be strictly positive
    #[error("Duration for '{field}' must be positive, got {minutes} minutes")]
    NonPositiveDuration { field: String, minutes: i64 },

    /// Busy intervals must be sorted ascending by start
    #[error("Busy intervals are not sorted by start time (index {index})")]
    UnsortedIntervals { index: usize },

    /// A move would leave the goal window
    #[error("New time {start} is outside the goal window ({goal_start} - {goal_end})")]
    OutsideGoal {
        start: DateTime<Utc>,
        goal_start: DateTime<Utc>,
        goal_end: DateTime<Utc>,
    },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
