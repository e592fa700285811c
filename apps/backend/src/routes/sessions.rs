//! Practice session endpoints

use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{NaiveDate, Utc};

use practice_core::{validate_session_duration, SessionStatus};

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::routes::auth::AuthenticatedUser;
use crate::AppState;

fn validate_notes(notes: Option<&str>) -> Result<()> {
    if notes.is_some_and(|n| n.len() > 1000) {
        return Err(ApiError::BadRequest(
            "Notes must be less than 1000 characters".to_string(),
        ));
    }
    Ok(())
}

/// GET /api/sessions
pub async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Query(filter): Query<SessionFilter>,
) -> Result<Json<SessionListResponse>> {
    let status = filter
        .status
        .as_deref()
        .map(SessionStatus::parse)
        .transpose()?;

    let sessions = state
        .db
        .list_sessions(
            auth.user_id,
            filter.from,
            filter.to,
            status.map(|s| s.as_str()),
        )
        .await?;

    let session_ids: Vec<i64> = sessions.iter().map(|s| s.id).collect();
    let piece_rows = state.db.session_pieces_for(&session_ids).await?;
    let exercise_rows = state.db.session_exercises_for(&session_ids).await?;

    let mut pieces_by_session: HashMap<i64, Vec<SessionPieceRef>> = HashMap::new();
    for row in piece_rows {
        pieces_by_session
            .entry(row.session_id)
            .or_default()
            .push(SessionPieceRef {
                id: row.piece_id,
                name: row.name,
                composer: row.composer,
            });
    }

    let mut exercises_by_session: HashMap<i64, Vec<SessionExerciseRef>> = HashMap::new();
    for row in exercise_rows {
        exercises_by_session
            .entry(row.session_id)
            .or_default()
            .push(SessionExerciseRef {
                id: row.exercise_id,
                name: row.name,
            });
    }

    let sessions = sessions
        .into_iter()
        .map(|s| SessionSummary {
            id: s.id,
            date: s.session_date,
            duration: s.duration,
            status: s.status,
            notes: s.notes,
            pieces: pieces_by_session.remove(&s.id).unwrap_or_default(),
            exercises: exercises_by_session.remove(&s.id).unwrap_or_default(),
            created_at: s.created_at,
            updated_at: s.updated_at,
            completed_at: s.completed_at,
        })
        .collect();

    Ok(Json(SessionListResponse { sessions }))
}

/// GET /api/sessions/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(session_id): Path<i64>,
) -> Result<Json<SingleSessionResponse>> {
    let session = state
        .db
        .get_session(auth.user_id, session_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Session not found or access denied".to_string()))?;

    let piece_rows = state.db.session_pieces_for(&[session.id]).await?;
    let exercise_rows = state.db.session_exercises_for(&[session.id]).await?;

    Ok(Json(SingleSessionResponse {
        session: SessionDetail {
            id: session.id,
            date: session.session_date,
            duration: session.duration,
            status: session.status,
            notes: session.notes,
            pieces: piece_rows
                .into_iter()
                .map(|row| SessionPieceDetail {
                    id: row.piece_id,
                    name: row.name,
                    composer: row.composer,
                    duration_minutes: row.duration_minutes,
                    notes: row.notes,
                })
                .collect(),
            exercises: exercise_rows
                .into_iter()
                .map(|row| SessionExerciseDetail {
                    id: row.exercise_id,
                    name: row.name,
                    duration_minutes: row.duration_minutes,
                    notes: row.notes,
                })
                .collect(),
            created_at: session.created_at,
            updated_at: session.updated_at,
            completed_at: session.completed_at,
        },
    }))
}

/// POST /api/sessions
pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Json(payload): Json<CreateSessionRequest>,
) -> Result<(StatusCode, Json<CreateSessionResponse>)> {
    let duration = validate_session_duration(payload.duration)?;
    validate_notes(payload.notes.as_deref())?;

    let status = payload.status.unwrap_or_default();
    let pieces = payload.pieces.unwrap_or_default();
    let exercises = payload.exercises.unwrap_or_default();

    let session_id = state
        .db
        .create_session(
            auth.user_id,
            payload.date,
            duration,
            status.as_str(),
            payload.notes.as_deref(),
            &pieces,
            &exercises,
        )
        .await?;

    // Completed sessions accrue into the per-day statistics row.
    if status == SessionStatus::Completed {
        state
            .db
            .record_completion(
                auth.user_id,
                payload.date,
                duration,
                pieces.len() as i32,
                exercises.len() as i32,
            )
            .await?;
    }

    tracing::info!(
        "New session created: {} (ID: {}, User: {})",
        payload.date,
        session_id,
        auth.username
    );

    Ok((
        StatusCode::CREATED,
        Json(CreateSessionResponse {
            message: "Session created successfully".to_string(),
            session: CreatedSession {
                id: session_id,
                date: payload.date,
                duration,
                status: status.as_str().to_string(),
                notes: payload.notes,
                pieces,
                exercises,
            },
        }),
    ))
}

/// PUT /api/sessions/{id}
pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(session_id): Path<i64>,
    Json(payload): Json<UpdateSessionRequest>,
) -> Result<Json<MessageResponse>> {
    if payload.is_empty() {
        return Err(ApiError::BadRequest(
            "At least one field must be updated".to_string(),
        ));
    }

    let mut session = state
        .db
        .get_session(auth.user_id, session_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Session not found or access denied".to_string()))?;

    let previous_status = SessionStatus::parse(&session.status)?;

    if let Some(date) = payload.date {
        session.session_date = date;
    }
    if let Some(duration) = payload.duration {
        session.duration = validate_session_duration(duration)?;
    }
    validate_notes(payload.notes.as_deref())?;
    if let Some(notes) = payload.notes {
        session.notes = Some(notes);
    }

    // completed_at tracks the status: set on the transition into Completed,
    // cleared whenever the session leaves Completed.
    let mut newly_completed = false;
    if let Some(status) = payload.status {
        session.status = status.as_str().to_string();
        match status {
            SessionStatus::Completed => {
                if previous_status != SessionStatus::Completed {
                    session.completed_at = Some(Utc::now());
                    newly_completed = true;
                }
            }
            _ => session.completed_at = None,
        }
    }

    state.db.update_session(&session).await?;

    if newly_completed {
        let (piece_count, exercise_count) = state.db.count_session_items(session_id).await?;
        state
            .db
            .record_completion(
                auth.user_id,
                session.session_date,
                session.duration,
                piece_count as i32,
                exercise_count as i32,
            )
            .await?;
    }

    tracing::info!("Session updated: ID {} (User: {})", session_id, auth.username);

    Ok(Json(MessageResponse {
        message: "Session updated successfully".to_string(),
    }))
}

/// DELETE /api/sessions/{id}
pub async fn delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(session_id): Path<i64>,
) -> Result<Json<MessageResponse>> {
    let session = state
        .db
        .get_session(auth.user_id, session_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Session not found or access denied".to_string()))?;

    // Join rows cascade; accrued practice_statistics stay untouched.
    state.db.delete_session(auth.user_id, session_id).await?;

    tracing::info!(
        "Session deleted: {} (ID: {}, User: {})",
        session.session_date,
        session_id,
        auth.username
    );

    Ok(Json(MessageResponse {
        message: "Session deleted successfully".to_string(),
    }))
}

/// GET /api/sessions/range/{from}/{to}
pub async fn range(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path((from, to)): Path<(NaiveDate, NaiveDate)>,
) -> Result<Json<SessionRangeResponse>> {
    let sessions = state.db.sessions_in_range(auth.user_id, from, to).await?;

    Ok(Json(SessionRangeResponse { sessions }))
}
