//! Validation for statistics parameters and session fields.
//!
//! Out-of-range values are rejected, never clamped; the API layer turns
//! these errors into client-error responses before any query is issued.

use crate::error::{DomainError, Result};

/// Inclusive bounds for the practice-by-day window.
pub const MIN_DAY_WINDOW: i64 = 1;
pub const MAX_DAY_WINDOW: i64 = 365;

/// Inclusive bounds for a session duration in minutes.
pub const MIN_SESSION_MINUTES: i64 = 1;
pub const MAX_SESSION_MINUTES: i64 = 480;

/// Validate a day-window parameter to [1, 365].
pub fn validate_day_window(days: i64) -> Result<u32> {
    if (MIN_DAY_WINDOW..=MAX_DAY_WINDOW).contains(&days) {
        Ok(days as u32)
    } else {
        Err(DomainError::DayWindowOutOfRange { days })
    }
}

/// Validate a calendar month to [1, 12].
pub fn validate_month(month: i64) -> Result<u32> {
    if (1..=12).contains(&month) {
        Ok(month as u32)
    } else {
        Err(DomainError::MonthOutOfRange { month })
    }
}

/// Validate a session duration to [1, 480] minutes.
pub fn validate_session_duration(minutes: i64) -> Result<i32> {
    if (MIN_SESSION_MINUTES..=MAX_SESSION_MINUTES).contains(&minutes) {
        Ok(minutes as i32)
    } else {
        Err(DomainError::DurationOutOfRange { minutes })
    }
}
