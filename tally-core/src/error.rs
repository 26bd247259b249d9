//! Structured error types for tally-core.
//!
//! Uses `thiserror` for composable library errors; the binary crate wraps
//! them with `anyhow` for convenience.

use std::time::Duration;

use thiserror::Error;

/// Main error type for tally-core operations
#[derive(Error, Debug)]
pub enum TallyError {
    /// A date parameter failed to parse
    #[error("invalid date '{value}': {reason}")]
    InvalidDate { value: String, reason: String },

    /// Configuration rejected before any query could run
    #[error("configuration error: {reason}")]
    Config { reason: String },

    /// The pool could not produce a usable connection
    #[error("database connection unavailable: {0}")]
    Connection(#[source] sqlx::Error),

    /// A statement failed during execution
    #[error("query execution failed: {0}")]
    Query(#[source] sqlx::Error),

    /// A statement exceeded its computed timeout
    #[error("query timed out after {}s", .after.as_secs())]
    Timeout { after: Duration },
}

/// Result type alias for tally-core operations
pub type Result<T> = std::result::Result<T, TallyError>;

impl TallyError {
    /// Create an invalid date error
    pub fn invalid_date(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidDate {
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a config error
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }
}
