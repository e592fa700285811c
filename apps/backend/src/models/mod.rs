//! Database models and API types

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use std::collections::HashMap;
use uuid::Uuid;

// Re-export shared types from practice-core
pub use practice_core::{DailyTotals, MonthlySummary, PieceStatus, SessionStatus, StreakSummary};

// === Database Entity Types ===

/// Registered user account
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub token: String,
    pub username: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_seen_at: DateTime<Utc>,
}

impl User {
    /// Convert to the API profile shape
    pub fn to_profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            created_at: self.created_at,
            last_seen_at: self.last_seen_at,
        }
    }
}

/// Piece stored in PostgreSQL
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbPiece {
    pub id: i64,
    pub user_id: Uuid,
    pub name: String,
    pub composer: String,
    pub work_classification: Option<String>,
    pub source: Option<String>,
    pub status: String,
    pub play_counter: i32,
    pub last_played_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DbPiece {
    /// Convert to API piece type
    pub fn to_response(&self) -> PieceResponse {
        PieceResponse {
            id: self.id,
            name: self.name.clone(),
            composer: self.composer.clone(),
            work_classification: self.work_classification.clone(),
            source: self.source.clone(),
            status: self.status.clone(),
            play_counter: self.play_counter,
            last_played_date: self.last_played_date,
            creation_date: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Exercise stored in PostgreSQL
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbExercise {
    pub id: i64,
    pub user_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub last_practiced_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DbExercise {
    /// Convert to API exercise type
    pub fn to_response(&self) -> ExerciseResponse {
        ExerciseResponse {
            id: self.id,
            name: self.name.clone(),
            description: self.description.clone(),
            last_practiced_date: self.last_practiced_date,
            creation_date: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Practice session stored in PostgreSQL
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbSession {
    pub id: i64,
    pub user_id: Uuid,
    pub session_date: NaiveDate,
    pub duration: i32,
    pub status: String,
    pub notes: Option<String>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Join row linking a session to a piece, with the piece's display fields
#[derive(Debug, Clone, FromRow)]
pub struct SessionPieceRow {
    pub session_id: i64,
    pub piece_id: i64,
    pub name: String,
    pub composer: String,
    pub duration_minutes: i32,
    pub notes: Option<String>,
}

/// Join row linking a session to an exercise
#[derive(Debug, Clone, FromRow)]
pub struct SessionExerciseRow {
    pub session_id: i64,
    pub exercise_id: i64,
    pub name: String,
    pub duration_minutes: i32,
    pub notes: Option<String>,
}

/// Session row with join counts, for range queries
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SessionRangeRow {
    pub id: i64,
    #[serde(rename = "date")]
    pub session_date: NaiveDate,
    pub duration: i32,
    pub status: String,
    pub notes: Option<String>,
    pub piece_count: i64,
    pub exercise_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Per-day practice totals for the practice-by-day window
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct DailyPracticeRow {
    pub date: NaiveDate,
    pub total_minutes: i64,
    pub session_count: i64,
}

/// Per-piece aggregate over completed sessions
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PieceStatsRow {
    pub id: i64,
    pub name: String,
    pub composer: String,
    pub status: String,
    pub play_counter: i32,
    pub last_played_date: Option<NaiveDate>,
    pub session_count: i64,
    pub total_practice_minutes: i64,
}

/// Per-exercise aggregate over completed sessions
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ExerciseStatsRow {
    pub id: i64,
    pub name: String,
    pub last_practiced_date: Option<NaiveDate>,
    pub session_count: i64,
    pub total_practice_minutes: i64,
}

/// Per-day row of a monthly summary
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct MonthlyDailyRow {
    pub date: NaiveDate,
    pub total_minutes: i64,
    pub session_count: i64,
    pub unique_pieces_practiced: i64,
    pub unique_exercises_practiced: i64,
}

/// Distinct practice day feeding the streak calculator
#[derive(Debug, Clone, FromRow)]
pub struct PracticeDayRow {
    pub practice_date: NaiveDate,
    pub total_minutes: i64,
}

/// Per-day created-resource counts for the activity feed
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ActivityRow {
    pub date: NaiveDate,
    pub pieces: i64,
    pub exercises: i64,
    pub sessions: i64,
}

/// Dashboard rollup, all fields zero-filled
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_pieces: i64,
    pub training_pieces: i64,
    pub repertoire_pieces: i64,
    pub total_sessions: i64,
    pub completed_sessions: i64,
    pub total_practice_minutes: i64,
    pub total_exercises: i64,
}

// === API Request/Response Types ===

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    #[serde(rename = "firstName")]
    pub first_name: Option<String>,
    #[serde(rename = "lastName")]
    pub last_name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub message: String,
    pub user: UserProfile,
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_seen_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub user: UserProfile,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(rename = "firstName")]
    pub first_name: Option<String>,
    #[serde(rename = "lastName")]
    pub last_name: Option<String>,
    pub email: Option<String>,
}

impl UpdateProfileRequest {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none() && self.last_name.is_none() && self.email.is_none()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PreferencesResponse {
    pub preferences: HashMap<String, String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdatePreferencesRequest {
    pub preferences: HashMap<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct ActivityQuery {
    pub days: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct ActivityResponse {
    pub activities: Vec<ActivityRow>,
}

#[derive(Debug, Serialize)]
pub struct ProfileSummaryResponse {
    pub user: UserProfile,
    pub stats: ProfileSummaryStats,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSummaryStats {
    pub total_pieces: i64,
    pub total_exercises: i64,
    pub total_sessions: i64,
    pub total_practice_minutes: i64,
    pub recent_sessions: i64,
}

// Piece types

#[derive(Debug, Serialize, Deserialize)]
pub struct PieceResponse {
    pub id: i64,
    pub name: String,
    pub composer: String,
    pub work_classification: Option<String>,
    pub source: Option<String>,
    pub status: String,
    pub play_counter: i32,
    pub last_played_date: Option<NaiveDate>,
    pub creation_date: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PieceListResponse {
    pub pieces: Vec<PieceResponse>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SinglePieceResponse {
    pub piece: PieceResponse,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatePieceResponse {
    pub message: String,
    pub piece: PieceResponse,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatePieceRequest {
    pub name: String,
    pub composer: String,
    pub work_classification: Option<String>,
    pub source: Option<String>,
    pub status: PieceStatus,
    pub play_count: Option<i32>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UpdatePieceRequest {
    pub name: Option<String>,
    pub composer: Option<String>,
    pub work_classification: Option<String>,
    pub source: Option<String>,
    pub status: Option<PieceStatus>,
    pub play_count: Option<i32>,
}

impl UpdatePieceRequest {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.composer.is_none()
            && self.work_classification.is_none()
            && self.source.is_none()
            && self.status.is_none()
            && self.play_count.is_none()
    }
}

// Exercise types

#[derive(Debug, Serialize, Deserialize)]
pub struct ExerciseResponse {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub last_practiced_date: Option<NaiveDate>,
    pub creation_date: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExerciseListResponse {
    pub exercises: Vec<ExerciseResponse>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SingleExerciseResponse {
    pub exercise: ExerciseResponse,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateExerciseResponse {
    pub message: String,
    pub exercise: ExerciseResponse,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateExerciseRequest {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UpdateExerciseRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl UpdateExerciseRequest {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none()
    }
}

// Session types

/// Piece reference embedded in a session listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionPieceRef {
    pub id: i64,
    pub name: String,
    pub composer: String,
}

/// Exercise reference embedded in a session listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionExerciseRef {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct SessionSummary {
    pub id: i64,
    pub date: NaiveDate,
    pub duration: i32,
    pub status: String,
    pub notes: Option<String>,
    pub pieces: Vec<SessionPieceRef>,
    pub exercises: Vec<SessionExerciseRef>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Piece detail with per-session practice time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionPieceDetail {
    pub id: i64,
    pub name: String,
    pub composer: String,
    pub duration_minutes: i32,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionExerciseDetail {
    pub id: i64,
    pub name: String,
    pub duration_minutes: i32,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SessionDetail {
    pub id: i64,
    pub date: NaiveDate,
    pub duration: i32,
    pub status: String,
    pub notes: Option<String>,
    pub pieces: Vec<SessionPieceDetail>,
    pub exercises: Vec<SessionExerciseDetail>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct SessionListResponse {
    pub sessions: Vec<SessionSummary>,
}

#[derive(Debug, Serialize)]
pub struct SingleSessionResponse {
    pub session: SessionDetail,
}

#[derive(Debug, Serialize)]
pub struct SessionRangeResponse {
    pub sessions: Vec<SessionRangeRow>,
}

#[derive(Debug, Deserialize)]
pub struct SessionFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub status: Option<String>,
}

/// Piece or exercise attached to a session being created
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionItemInput {
    pub id: i64,
    pub duration_minutes: Option<i32>,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateSessionRequest {
    pub date: NaiveDate,
    pub duration: i64,
    pub status: Option<SessionStatus>,
    pub notes: Option<String>,
    pub pieces: Option<Vec<SessionItemInput>>,
    pub exercises: Option<Vec<SessionItemInput>>,
}

#[derive(Debug, Serialize)]
pub struct CreateSessionResponse {
    pub message: String,
    pub session: CreatedSession,
}

/// Echo of a freshly created session
#[derive(Debug, Serialize)]
pub struct CreatedSession {
    pub id: i64,
    pub date: NaiveDate,
    pub duration: i32,
    pub status: String,
    pub notes: Option<String>,
    pub pieces: Vec<SessionItemInput>,
    pub exercises: Vec<SessionItemInput>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UpdateSessionRequest {
    pub date: Option<NaiveDate>,
    pub duration: Option<i64>,
    pub status: Option<SessionStatus>,
    pub notes: Option<String>,
}

impl UpdateSessionRequest {
    pub fn is_empty(&self) -> bool {
        self.date.is_none()
            && self.duration.is_none()
            && self.status.is_none()
            && self.notes.is_none()
    }
}

/// Generic acknowledgement body
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

// Statistics types

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub stats: DashboardStats,
}

#[derive(Debug, Serialize)]
pub struct PracticeStatsResponse {
    #[serde(rename = "practiceStats")]
    pub practice_stats: Vec<DailyPracticeRow>,
}

#[derive(Debug, Serialize)]
pub struct PieceStatsResponse {
    #[serde(rename = "pieceStats")]
    pub piece_stats: Vec<PieceStatsRow>,
}

#[derive(Debug, Serialize)]
pub struct ExerciseStatsResponse {
    #[serde(rename = "exerciseStats")]
    pub exercise_stats: Vec<ExerciseStatsRow>,
}

#[derive(Debug, Serialize)]
pub struct MonthlyResponse {
    pub month: String,
    pub summary: MonthlySummary,
    #[serde(rename = "dailyStats")]
    pub daily_stats: Vec<MonthlyDailyRow>,
}
