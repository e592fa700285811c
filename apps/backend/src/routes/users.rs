//! User registration, profile, preferences and account endpoints

use std::collections::HashMap;

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Extension, Json,
};
use chrono::Utc;
use serde_json::{json, Value};

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::routes::auth::AuthenticatedUser;
use crate::AppState;

/// Preference keys accepted by the update endpoint
const ALLOWED_PREFERENCE_KEYS: [&str; 9] = [
    "theme",
    "language",
    "default_session_duration",
    "week_starts_on",
    "show_completed_sessions",
    "auto_save",
    "notification_enabled",
    "email_notifications",
    "practice_reminders",
];

fn validate_username(username: &str) -> Result<()> {
    if username.len() < 3 || username.len() > 50 {
        return Err(ApiError::BadRequest(
            "Username must be between 3 and 50 characters".to_string(),
        ));
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(ApiError::BadRequest(
            "Username can only contain letters, numbers, and underscores".to_string(),
        ));
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<()> {
    let valid = email.split_once('@').is_some_and(|(local, domain)| {
        !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
    });
    if !valid {
        return Err(ApiError::BadRequest(
            "Please provide a valid email address".to_string(),
        ));
    }
    Ok(())
}

fn validate_name_part(value: Option<&str>, field: &str) -> Result<()> {
    if value.is_some_and(|v| v.len() > 100) {
        return Err(ApiError::BadRequest(format!(
            "{} must be less than 100 characters",
            field
        )));
    }
    Ok(())
}

/// POST /api/users/register
/// Creates a user with a fresh token and default preferences
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>)> {
    validate_username(&payload.username)?;
    validate_email(&payload.email)?;
    validate_name_part(payload.first_name.as_deref(), "First name")?;
    validate_name_part(payload.last_name.as_deref(), "Last name")?;

    if state.db.user_exists(&payload.username, &payload.email).await? {
        return Err(ApiError::Conflict(
            "Username or email already registered".to_string(),
        ));
    }

    let user = state
        .db
        .create_user(
            &payload.username,
            &payload.email,
            payload.first_name.as_deref(),
            payload.last_name.as_deref(),
        )
        .await?;

    tracing::info!("New user registered: {} (ID: {})", user.username, user.id);

    let token = user.token.clone();
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User registered successfully".to_string(),
            user: user.to_profile(),
            token,
        }),
    ))
}

/// GET /api/users/profile
pub async fn profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<ProfileResponse>> {
    let user = state
        .db
        .get_user(auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User profile not found".to_string()))?;

    Ok(Json(ProfileResponse {
        user: user.to_profile(),
    }))
}

/// PUT /api/users/profile
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<MessageResponse>> {
    if payload.is_empty() {
        return Err(ApiError::BadRequest(
            "At least one field must be updated".to_string(),
        ));
    }

    validate_name_part(payload.first_name.as_deref(), "First name")?;
    validate_name_part(payload.last_name.as_deref(), "Last name")?;

    let mut user = state
        .db
        .get_user(auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User profile not found".to_string()))?;

    if let Some(first_name) = payload.first_name {
        user.first_name = Some(first_name);
    }
    if let Some(last_name) = payload.last_name {
        user.last_name = Some(last_name);
    }
    if let Some(email) = payload.email {
        validate_email(&email)?;
        if state.db.email_in_use_by_other(&email, auth.user_id).await? {
            return Err(ApiError::Conflict(
                "This email is already registered to another account".to_string(),
            ));
        }
        user.email = email;
    }

    state.db.update_profile(&user).await?;

    tracing::info!(
        "User profile updated: {} (ID: {})",
        auth.username,
        auth.user_id
    );

    Ok(Json(MessageResponse {
        message: "Profile updated successfully".to_string(),
    }))
}

/// GET /api/users/preferences
pub async fn get_preferences(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<PreferencesResponse>> {
    let preferences: HashMap<String, String> = state
        .db
        .get_preferences(auth.user_id)
        .await?
        .into_iter()
        .collect();

    Ok(Json(PreferencesResponse { preferences }))
}

/// PUT /api/users/preferences
pub async fn update_preferences(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Json(payload): Json<UpdatePreferencesRequest>,
) -> Result<Json<MessageResponse>> {
    let updates: Vec<(String, String)> = payload
        .preferences
        .into_iter()
        .filter(|(key, _)| ALLOWED_PREFERENCE_KEYS.contains(&key.as_str()))
        .map(|(key, value)| {
            let value = match value {
                Value::String(s) => s,
                other => other.to_string(),
            };
            (key, value)
        })
        .collect();

    if updates.is_empty() {
        return Err(ApiError::BadRequest(
            "At least one valid preference must be provided".to_string(),
        ));
    }

    for (key, value) in &updates {
        state.db.upsert_preference(auth.user_id, key, value).await?;
    }

    tracing::info!(
        "User preferences updated: {} (ID: {})",
        auth.username,
        auth.user_id
    );

    Ok(Json(MessageResponse {
        message: "Preferences updated successfully".to_string(),
    }))
}

/// GET /api/users/activity
/// Unlike statistics paths, the window defaults to 30 and clamps at 365.
pub async fn activity(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Query(query): Query<ActivityQuery>,
) -> Result<Json<ActivityResponse>> {
    let days = query.days.unwrap_or(30).clamp(1, 365) as i32;

    let activities = state.db.activity(auth.user_id, days).await?;

    Ok(Json(ActivityResponse { activities }))
}

/// GET /api/users/profile/summary
pub async fn profile_summary(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<ProfileSummaryResponse>> {
    let user = state
        .db
        .get_user(auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User profile not found".to_string()))?;

    let stats = state.db.profile_summary_stats(auth.user_id).await?;

    Ok(Json(ProfileSummaryResponse {
        user: user.to_profile(),
        stats,
    }))
}

/// GET /api/users/export
pub async fn export(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<impl IntoResponse> {
    let user = state
        .db
        .get_user(auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User profile not found".to_string()))?;

    let pieces = state.db.list_pieces(auth.user_id).await?;
    let exercises = state.db.list_exercises(auth.user_id).await?;
    let sessions = state
        .db
        .list_sessions(auth.user_id, None, None, None)
        .await?;
    let preferences: HashMap<String, String> = state
        .db
        .get_preferences(auth.user_id)
        .await?
        .into_iter()
        .collect();

    let export_date = Utc::now();
    let body = json!({
        "user": {
            "id": user.id,
            "username": user.username,
            "email": user.email,
        },
        "exportDate": export_date,
        "version": "1.0.0",
        "data": {
            "pieces": pieces,
            "exercises": exercises,
            "sessions": sessions,
            "preferences": preferences,
        },
    });

    let filename = format!(
        "con-bravura-export-{}-{}.json",
        user.username,
        export_date.date_naive()
    );

    tracing::info!("User data exported: {} (ID: {})", user.username, user.id);

    Ok((
        [(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", filename),
        )],
        Json(body),
    ))
}

/// DELETE /api/users/account
/// Soft delete; the account's token stops resolving immediately
pub async fn delete_account(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<MessageResponse>> {
    state.db.deactivate_user(auth.user_id).await?;

    tracing::info!(
        "User account deleted: {} (ID: {})",
        auth.username,
        auth.user_id
    );

    Ok(Json(MessageResponse {
        message: "Account deleted successfully".to_string(),
    }))
}
