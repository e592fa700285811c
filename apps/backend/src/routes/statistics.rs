//! Statistics endpoints
//!
//! Read-only rollups over the authenticated user's rows. Path parameters
//! are validated before any query runs; out-of-range values are rejected,
//! never clamped.

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::Utc;

use practice_core::{
    compute_streaks, summarize_month, validate_day_window, validate_month, DailyTotals,
    StreakSummary,
};

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::routes::auth::AuthenticatedUser;
use crate::AppState;

/// GET /api/statistics/dashboard
pub async fn dashboard(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<DashboardResponse>> {
    let stats = state.db.dashboard_stats(auth.user_id).await?;

    Ok(Json(DashboardResponse { stats }))
}

/// GET /api/statistics/practice/{days}
pub async fn practice(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(days): Path<String>,
) -> Result<Json<PracticeStatsResponse>> {
    let days: i64 = days
        .parse()
        .map_err(|_| ApiError::BadRequest("Days must be between 1 and 365".to_string()))?;
    let days = validate_day_window(days)?;

    let practice_stats = state.db.practice_by_day(auth.user_id, days as i32).await?;

    Ok(Json(PracticeStatsResponse { practice_stats }))
}

/// GET /api/statistics/pieces
pub async fn pieces(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<PieceStatsResponse>> {
    let piece_stats = state.db.piece_stats(auth.user_id).await?;

    Ok(Json(PieceStatsResponse { piece_stats }))
}

/// GET /api/statistics/exercises
pub async fn exercises(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<ExerciseStatsResponse>> {
    let exercise_stats = state.db.exercise_stats(auth.user_id).await?;

    Ok(Json(ExerciseStatsResponse { exercise_stats }))
}

/// GET /api/statistics/monthly/{year}/{month}
pub async fn monthly(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path((year, month)): Path<(String, String)>,
) -> Result<Json<MonthlyResponse>> {
    let invalid = || {
        ApiError::BadRequest(
            "Year must be a valid year and month must be between 1 and 12".to_string(),
        )
    };
    let year: i32 = year.parse().map_err(|_| invalid())?;
    let month: i64 = month.parse().map_err(|_| invalid())?;
    let month = validate_month(month)?;

    let daily_stats = state
        .db
        .monthly_daily_stats(auth.user_id, year, month as i32)
        .await?;

    let daily_totals: Vec<DailyTotals> = daily_stats
        .iter()
        .map(|d| DailyTotals {
            date: d.date,
            total_minutes: d.total_minutes,
            session_count: d.session_count,
        })
        .collect();
    let summary = summarize_month(&daily_totals);

    Ok(Json(MonthlyResponse {
        month: format!("{}-{:02}", year, month),
        summary,
        daily_stats,
    }))
}

/// GET /api/statistics/streak
pub async fn streak(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<StreakSummary>> {
    let practice_days = state.db.recent_practice_days(auth.user_id).await?;
    let days: Vec<chrono::NaiveDate> = practice_days.iter().map(|d| d.practice_date).collect();

    let summary = compute_streaks(&days, Utc::now().date_naive());

    Ok(Json(summary))
}
