//! Error types for practice-core.

use thiserror::Error;

/// Result type alias using DomainError.
pub type Result<T> = std::result::Result<T, DomainError>;

/// Errors raised by domain-level validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("days must be between 1 and 365, got {days}")]
    DayWindowOutOfRange { days: i64 },

    #[error("month must be between 1 and 12, got {month}")]
    MonthOutOfRange { month: i64 },

    #[error("duration must be between 1 and 480 minutes, got {minutes}")]
    DurationOutOfRange { minutes: i64 },

    #[error("unknown session status: {value}")]
    UnknownSessionStatus { value: String },

    #[error("unknown piece status: {value}")]
    UnknownPieceStatus { value: String },
}
