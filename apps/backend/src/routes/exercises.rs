//! Exercise endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::routes::auth::AuthenticatedUser;
use crate::AppState;

fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() || name.len() > 200 {
        return Err(ApiError::BadRequest(
            "Exercise name must be between 1 and 200 characters".to_string(),
        ));
    }
    Ok(())
}

fn validate_description(description: Option<&str>) -> Result<()> {
    if description.is_some_and(|d| d.len() > 1000) {
        return Err(ApiError::BadRequest(
            "Description must be less than 1000 characters".to_string(),
        ));
    }
    Ok(())
}

/// GET /api/exercises
pub async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<ExerciseListResponse>> {
    let exercises = state.db.list_exercises(auth.user_id).await?;

    Ok(Json(ExerciseListResponse {
        exercises: exercises.iter().map(DbExercise::to_response).collect(),
    }))
}

/// GET /api/exercises/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(exercise_id): Path<i64>,
) -> Result<Json<SingleExerciseResponse>> {
    let exercise = state
        .db
        .get_exercise(auth.user_id, exercise_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Exercise not found or access denied".to_string()))?;

    Ok(Json(SingleExerciseResponse {
        exercise: exercise.to_response(),
    }))
}

/// POST /api/exercises
pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Json(payload): Json<CreateExerciseRequest>,
) -> Result<(StatusCode, Json<CreateExerciseResponse>)> {
    validate_name(&payload.name)?;
    validate_description(payload.description.as_deref())?;

    let exercise = state
        .db
        .create_exercise(auth.user_id, &payload.name, payload.description.as_deref())
        .await?;

    tracing::info!(
        "New exercise created: {} (ID: {}, User: {})",
        exercise.name,
        exercise.id,
        auth.username
    );

    Ok((
        StatusCode::CREATED,
        Json(CreateExerciseResponse {
            message: "Exercise created successfully".to_string(),
            exercise: exercise.to_response(),
        }),
    ))
}

/// PUT /api/exercises/{id}
pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(exercise_id): Path<i64>,
    Json(payload): Json<UpdateExerciseRequest>,
) -> Result<Json<MessageResponse>> {
    if payload.is_empty() {
        return Err(ApiError::BadRequest(
            "At least one field must be updated".to_string(),
        ));
    }

    let mut exercise = state
        .db
        .get_exercise(auth.user_id, exercise_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Exercise not found or access denied".to_string()))?;

    if let Some(name) = payload.name {
        validate_name(&name)?;
        exercise.name = name;
    }
    validate_description(payload.description.as_deref())?;
    if let Some(description) = payload.description {
        exercise.description = Some(description);
    }

    state.db.update_exercise(&exercise).await?;

    tracing::info!("Exercise updated: ID {} (User: {})", exercise_id, auth.username);

    Ok(Json(MessageResponse {
        message: "Exercise updated successfully".to_string(),
    }))
}

/// DELETE /api/exercises/{id}
pub async fn delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(exercise_id): Path<i64>,
) -> Result<Json<MessageResponse>> {
    let deleted = state.db.delete_exercise(auth.user_id, exercise_id).await?;
    if !deleted {
        return Err(ApiError::NotFound(
            "Exercise not found or access denied".to_string(),
        ));
    }

    tracing::info!("Exercise deleted: ID {} (User: {})", exercise_id, auth.username);

    Ok(Json(MessageResponse {
        message: "Exercise deleted successfully".to_string(),
    }))
}

/// POST /api/exercises/{id}/practice
pub async fn practice(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(exercise_id): Path<i64>,
) -> Result<Json<MessageResponse>> {
    let exercise = state
        .db
        .get_exercise(auth.user_id, exercise_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Exercise not found or access denied".to_string()))?;

    state
        .db
        .mark_exercise_practiced(auth.user_id, exercise_id)
        .await?;

    tracing::info!(
        "Exercise practiced: {} (ID: {}, User: {})",
        exercise.name,
        exercise_id,
        auth.username
    );

    Ok(Json(MessageResponse {
        message: "Exercise marked as practiced".to_string(),
    }))
}
