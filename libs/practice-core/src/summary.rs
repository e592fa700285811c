//! Monthly practice summary aggregation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Per-day practice totals, one row per distinct day with completed sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyTotals {
    pub date: NaiveDate,
    pub total_minutes: i64,
    pub session_count: i64,
}

/// Overall summary block for a month of practice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySummary {
    pub total_minutes: i64,
    pub total_sessions: i64,
    /// Integer-rounded average; zero when no sessions were completed.
    pub avg_session_length: i64,
    /// Count of distinct days with at least one completed session.
    pub practice_days: i64,
}

/// Fold per-day rows into the month's summary block.
pub fn summarize_month(days: &[DailyTotals]) -> MonthlySummary {
    let total_minutes: i64 = days.iter().map(|d| d.total_minutes).sum();
    let total_sessions: i64 = days.iter().map(|d| d.session_count).sum();
    let avg_session_length = if total_sessions > 0 {
        (total_minutes as f64 / total_sessions as f64).round() as i64
    } else {
        0
    };

    MonthlySummary {
        total_minutes,
        total_sessions,
        avg_session_length,
        practice_days: days.len() as i64,
    }
}
