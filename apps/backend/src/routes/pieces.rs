//! Piece endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};

use practice_core::PieceStatus;

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::routes::auth::AuthenticatedUser;
use crate::AppState;

fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() || name.len() > 200 {
        return Err(ApiError::BadRequest(
            "Piece name must be between 1 and 200 characters".to_string(),
        ));
    }
    Ok(())
}

fn validate_composer(composer: &str) -> Result<()> {
    if composer.is_empty() || composer.len() > 100 {
        return Err(ApiError::BadRequest(
            "Composer name must be between 1 and 100 characters".to_string(),
        ));
    }
    Ok(())
}

fn validate_optional_fields(
    work_classification: Option<&str>,
    source: Option<&str>,
    play_count: Option<i32>,
) -> Result<()> {
    if work_classification.is_some_and(|w| w.len() > 100) {
        return Err(ApiError::BadRequest(
            "Work classification must be less than 100 characters".to_string(),
        ));
    }
    if source.is_some_and(|s| s.len() > 200) {
        return Err(ApiError::BadRequest(
            "Source must be less than 200 characters".to_string(),
        ));
    }
    if play_count.is_some_and(|c| c < 0) {
        return Err(ApiError::BadRequest(
            "Play count must be a non-negative integer".to_string(),
        ));
    }
    Ok(())
}

/// GET /api/pieces
pub async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<PieceListResponse>> {
    let pieces = state.db.list_pieces(auth.user_id).await?;

    Ok(Json(PieceListResponse {
        pieces: pieces.iter().map(DbPiece::to_response).collect(),
    }))
}

/// GET /api/pieces/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(piece_id): Path<i64>,
) -> Result<Json<SinglePieceResponse>> {
    let piece = state
        .db
        .get_piece(auth.user_id, piece_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Piece not found or access denied".to_string()))?;

    Ok(Json(SinglePieceResponse {
        piece: piece.to_response(),
    }))
}

/// POST /api/pieces
pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Json(payload): Json<CreatePieceRequest>,
) -> Result<(StatusCode, Json<CreatePieceResponse>)> {
    validate_name(&payload.name)?;
    validate_composer(&payload.composer)?;
    validate_optional_fields(
        payload.work_classification.as_deref(),
        payload.source.as_deref(),
        payload.play_count,
    )?;

    let piece = state
        .db
        .create_piece(
            auth.user_id,
            &payload.name,
            &payload.composer,
            payload.work_classification.as_deref(),
            payload.source.as_deref(),
            payload.status.as_str(),
            payload.play_count.unwrap_or(0),
        )
        .await?;

    tracing::info!(
        "New piece created: {} by {} (ID: {}, User: {})",
        piece.name,
        piece.composer,
        piece.id,
        auth.username
    );

    Ok((
        StatusCode::CREATED,
        Json(CreatePieceResponse {
            message: "Piece created successfully".to_string(),
            piece: piece.to_response(),
        }),
    ))
}

/// PUT /api/pieces/{id}
pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(piece_id): Path<i64>,
    Json(payload): Json<UpdatePieceRequest>,
) -> Result<Json<MessageResponse>> {
    if payload.is_empty() {
        return Err(ApiError::BadRequest(
            "At least one field must be updated".to_string(),
        ));
    }

    let mut piece = state
        .db
        .get_piece(auth.user_id, piece_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Piece not found or access denied".to_string()))?;

    if let Some(name) = payload.name {
        validate_name(&name)?;
        piece.name = name;
    }
    if let Some(composer) = payload.composer {
        validate_composer(&composer)?;
        piece.composer = composer;
    }
    validate_optional_fields(
        payload.work_classification.as_deref(),
        payload.source.as_deref(),
        payload.play_count,
    )?;
    if let Some(work_classification) = payload.work_classification {
        piece.work_classification = Some(work_classification);
    }
    if let Some(source) = payload.source {
        piece.source = Some(source);
    }
    if let Some(status) = payload.status {
        piece.status = status.as_str().to_string();
    }
    if let Some(play_count) = payload.play_count {
        piece.play_counter = play_count;
    }

    state.db.update_piece(&piece).await?;

    tracing::info!("Piece updated: ID {} (User: {})", piece_id, auth.username);

    Ok(Json(MessageResponse {
        message: "Piece updated successfully".to_string(),
    }))
}

/// DELETE /api/pieces/{id}
pub async fn delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(piece_id): Path<i64>,
) -> Result<Json<MessageResponse>> {
    let deleted = state.db.delete_piece(auth.user_id, piece_id).await?;
    if !deleted {
        return Err(ApiError::NotFound(
            "Piece not found or access denied".to_string(),
        ));
    }

    tracing::info!("Piece deleted: ID {} (User: {})", piece_id, auth.username);

    Ok(Json(MessageResponse {
        message: "Piece deleted successfully".to_string(),
    }))
}

/// GET /api/pieces/status/{status}
pub async fn by_status(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(status): Path<String>,
) -> Result<Json<PieceListResponse>> {
    let status = PieceStatus::parse(&status).map_err(|_| {
        ApiError::BadRequest("Status must be either \"In Training\" or \"Repertoire\"".to_string())
    })?;

    let pieces = state
        .db
        .list_pieces_by_status(auth.user_id, status.as_str())
        .await?;

    Ok(Json(PieceListResponse {
        pieces: pieces.iter().map(DbPiece::to_response).collect(),
    }))
}

/// POST /api/pieces/{id}/play
pub async fn play(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(piece_id): Path<i64>,
) -> Result<Json<MessageResponse>> {
    let piece = state
        .db
        .get_piece(auth.user_id, piece_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Piece not found or access denied".to_string()))?;

    state.db.mark_piece_played(auth.user_id, piece_id).await?;

    tracing::info!(
        "Piece played: {} by {} (ID: {}, User: {})",
        piece.name,
        piece.composer,
        piece_id,
        auth.username
    );

    Ok(Json(MessageResponse {
        message: "Piece marked as played".to_string(),
    }))
}
