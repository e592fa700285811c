//! Core practice-tracking library shared by the backend.
//!
//! Provides:
//! - Streak calculation over distinct practice days
//! - Monthly practice summary aggregation
//! - Input validation for statistics parameters
//! - Shared types (SessionStatus, PieceStatus, StreakSummary, etc.)

pub mod error;
pub mod streak;
pub mod summary;
pub mod types;
pub mod validate;

pub use error::{DomainError, Result};
pub use streak::compute_streaks;
pub use summary::{summarize_month, DailyTotals, MonthlySummary};
pub use types::{PieceStatus, SessionStatus, StreakSummary};
pub use validate::{validate_day_window, validate_month, validate_session_duration};
