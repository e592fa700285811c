//! Test fixtures and factory functions for creating test data.

use chrono::NaiveDate;
use serde_json::json;
use uuid::Uuid;

/// Generate a unique username to avoid collisions between test runs.
pub fn unique_username(prefix: &str) -> String {
    let suffix: String = Uuid::new_v4().simple().to_string()[..8].to_string();
    format!("{}_{}", prefix, suffix)
}

/// Create a register request body.
pub fn register_request(username: &str) -> serde_json::Value {
    json!({
        "username": username,
        "email": format!("{}@example.com", username),
        "firstName": "Test",
        "lastName": "User",
    })
}

/// Create a piece request body.
pub fn create_piece_request(name: &str, composer: &str, status: &str) -> serde_json::Value {
    json!({
        "name": name,
        "composer": composer,
        "status": status,
    })
}

/// Create an exercise request body.
pub fn create_exercise_request(name: &str) -> serde_json::Value {
    json!({
        "name": name,
        "description": "Five-finger patterns for independence and strength",
    })
}

/// Create a session request body without associated pieces or exercises.
pub fn create_session_request(date: NaiveDate, duration: i64, status: &str) -> serde_json::Value {
    json!({
        "date": date,
        "duration": duration,
        "status": status,
        "notes": "test session",
    })
}

/// Create a session request body with associated pieces and exercises.
pub fn create_session_request_with_items(
    date: NaiveDate,
    duration: i64,
    status: &str,
    piece_ids: &[i64],
    exercise_ids: &[i64],
) -> serde_json::Value {
    let pieces: Vec<serde_json::Value> = piece_ids
        .iter()
        .map(|id| json!({ "id": id, "duration_minutes": 15 }))
        .collect();
    let exercises: Vec<serde_json::Value> = exercise_ids
        .iter()
        .map(|id| json!({ "id": id, "duration_minutes": 10 }))
        .collect();

    json!({
        "date": date,
        "duration": duration,
        "status": status,
        "pieces": pieces,
        "exercises": exercises,
    })
}

/// Create an update preferences request body.
pub fn update_preferences_request(theme: &str) -> serde_json::Value {
    json!({
        "preferences": {
            "theme": theme,
            "bogus_key": "ignored",
        }
    })
}
