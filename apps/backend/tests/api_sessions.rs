//! Session API tests.
//!
//! These tests require a running PostgreSQL database.
//! Set DATABASE_URL before running.

mod common;

use axum::http::StatusCode;
use axum_test::TestServer;
use chrono::{Duration, Utc};

use common::fixtures;
use common::TestContext;

/// Test creating a planned session.
#[tokio::test]
#[ignore = "requires database"]
async fn test_create_planned_session() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (user_id, token) = ctx.create_test_user().await;

    let today = Utc::now().date_naive();
    let response = server
        .post("/api/sessions")
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(&token),
        )
        .json(&fixtures::create_session_request(today, 60, "Planned"))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["session"]["status"].as_str(), Some("Planned"));
    assert_eq!(body["session"]["duration"].as_i64(), Some(60));

    ctx.cleanup_user(user_id).await;
}

/// Test out-of-range durations are rejected before any insert.
#[tokio::test]
#[ignore = "requires database"]
async fn test_create_rejects_bad_duration() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (user_id, token) = ctx.create_test_user().await;
    let auth = TestContext::auth_header_value(&token);

    let today = Utc::now().date_naive();
    for duration in [0, 481, -10] {
        let response = server
            .post("/api/sessions")
            .add_header(axum::http::header::AUTHORIZATION, auth.clone())
            .json(&fixtures::create_session_request(today, duration, "Planned"))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    let response = server
        .get("/api/sessions")
        .add_header(axum::http::header::AUTHORIZATION, auth)
        .await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["sessions"].as_array().unwrap().len(), 0);

    ctx.cleanup_user(user_id).await;
}

/// Test session detail includes per-item durations and notes.
#[tokio::test]
#[ignore = "requires database"]
async fn test_session_detail_includes_items() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (user_id, token) = ctx.create_test_user().await;
    let auth = TestContext::auth_header_value(&token);

    let piece: serde_json::Value = server
        .post("/api/pieces")
        .add_header(axum::http::header::AUTHORIZATION, auth.clone())
        .json(&fixtures::create_piece_request("Clair de Lune", "Debussy", "In Training"))
        .await
        .json();
    let piece_id = piece["piece"]["id"].as_i64().unwrap();

    let exercise: serde_json::Value = server
        .post("/api/exercises")
        .add_header(axum::http::header::AUTHORIZATION, auth.clone())
        .json(&fixtures::create_exercise_request("Hanon Exercise No. 1"))
        .await
        .json();
    let exercise_id = exercise["exercise"]["id"].as_i64().unwrap();

    let today = Utc::now().date_naive();
    let created: serde_json::Value = server
        .post("/api/sessions")
        .add_header(axum::http::header::AUTHORIZATION, auth.clone())
        .json(&fixtures::create_session_request_with_items(
            today,
            75,
            "Planned",
            &[piece_id],
            &[exercise_id],
        ))
        .await
        .json();
    let session_id = created["session"]["id"].as_i64().unwrap();

    let response = server
        .get(&format!("/api/sessions/{}", session_id))
        .add_header(axum::http::header::AUTHORIZATION, auth)
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    let session = &body["session"];
    assert_eq!(session["pieces"].as_array().unwrap().len(), 1);
    assert_eq!(session["pieces"][0]["name"].as_str(), Some("Clair de Lune"));
    assert_eq!(session["pieces"][0]["duration_minutes"].as_i64(), Some(15));
    assert_eq!(session["exercises"].as_array().unwrap().len(), 1);
    assert_eq!(session["exercises"][0]["duration_minutes"].as_i64(), Some(10));

    ctx.cleanup_user(user_id).await;
}

/// Test completed_at follows status transitions in both directions.
#[tokio::test]
#[ignore = "requires database"]
async fn test_update_transitions_completed_at() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (user_id, token) = ctx.create_test_user().await;
    let auth = TestContext::auth_header_value(&token);

    let today = Utc::now().date_naive();
    let created: serde_json::Value = server
        .post("/api/sessions")
        .add_header(axum::http::header::AUTHORIZATION, auth.clone())
        .json(&fixtures::create_session_request(today, 45, "Planned"))
        .await
        .json();
    let session_id = created["session"]["id"].as_i64().unwrap();

    server
        .put(&format!("/api/sessions/{}", session_id))
        .add_header(axum::http::header::AUTHORIZATION, auth.clone())
        .json(&serde_json::json!({ "status": "Completed" }))
        .await
        .assert_status_ok();

    let detail: serde_json::Value = server
        .get(&format!("/api/sessions/{}", session_id))
        .add_header(axum::http::header::AUTHORIZATION, auth.clone())
        .await
        .json();
    assert!(!detail["session"]["completed_at"].is_null());

    server
        .put(&format!("/api/sessions/{}", session_id))
        .add_header(axum::http::header::AUTHORIZATION, auth.clone())
        .json(&serde_json::json!({ "status": "Cancelled" }))
        .await
        .assert_status_ok();

    let detail: serde_json::Value = server
        .get(&format!("/api/sessions/{}", session_id))
        .add_header(axum::http::header::AUTHORIZATION, auth)
        .await
        .json();
    assert!(detail["session"]["completed_at"].is_null());
    assert_eq!(detail["session"]["status"].as_str(), Some("Cancelled"));

    ctx.cleanup_user(user_id).await;
}

/// Test an empty patch is rejected.
#[tokio::test]
#[ignore = "requires database"]
async fn test_update_empty_patch_rejected() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (user_id, token) = ctx.create_test_user().await;
    let auth = TestContext::auth_header_value(&token);

    let today = Utc::now().date_naive();
    let created: serde_json::Value = server
        .post("/api/sessions")
        .add_header(axum::http::header::AUTHORIZATION, auth.clone())
        .json(&fixtures::create_session_request(today, 45, "Planned"))
        .await
        .json();
    let session_id = created["session"]["id"].as_i64().unwrap();

    let response = server
        .put(&format!("/api/sessions/{}", session_id))
        .add_header(axum::http::header::AUTHORIZATION, auth)
        .json(&serde_json::json!({}))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);

    ctx.cleanup_user(user_id).await;
}

/// Test list filtering by status.
#[tokio::test]
#[ignore = "requires database"]
async fn test_list_filters_by_status() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (user_id, token) = ctx.create_test_user().await;
    let auth = TestContext::auth_header_value(&token);

    let today = Utc::now().date_naive();
    server
        .post("/api/sessions")
        .add_header(axum::http::header::AUTHORIZATION, auth.clone())
        .json(&fixtures::create_session_request(today, 30, "Completed"))
        .await
        .assert_status(StatusCode::CREATED);
    server
        .post("/api/sessions")
        .add_header(axum::http::header::AUTHORIZATION, auth.clone())
        .json(&fixtures::create_session_request(today, 60, "Planned"))
        .await
        .assert_status(StatusCode::CREATED);

    let response = server
        .get("/api/sessions?status=Completed")
        .add_header(axum::http::header::AUTHORIZATION, auth)
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    let sessions = body["sessions"].as_array().unwrap();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0]["status"].as_str(), Some("Completed"));

    ctx.cleanup_user(user_id).await;
}

/// Test the range endpoint reports join counts per session.
#[tokio::test]
#[ignore = "requires database"]
async fn test_range_reports_item_counts() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (user_id, token) = ctx.create_test_user().await;
    let auth = TestContext::auth_header_value(&token);

    let piece: serde_json::Value = server
        .post("/api/pieces")
        .add_header(axum::http::header::AUTHORIZATION, auth.clone())
        .json(&fixtures::create_piece_request("Fur Elise", "Beethoven", "Repertoire"))
        .await
        .json();
    let piece_id = piece["piece"]["id"].as_i64().unwrap();

    let today = Utc::now().date_naive();
    server
        .post("/api/sessions")
        .add_header(axum::http::header::AUTHORIZATION, auth.clone())
        .json(&fixtures::create_session_request_with_items(
            today,
            30,
            "Planned",
            &[piece_id],
            &[],
        ))
        .await
        .assert_status(StatusCode::CREATED);

    let from = today - Duration::days(7);
    let to = today + Duration::days(1);
    let response = server
        .get(&format!("/api/sessions/range/{}/{}", from, to))
        .add_header(axum::http::header::AUTHORIZATION, auth)
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    let sessions = body["sessions"].as_array().unwrap();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0]["piece_count"].as_i64(), Some(1));
    assert_eq!(sessions[0]["exercise_count"].as_i64(), Some(0));

    ctx.cleanup_user(user_id).await;
}

/// Test deleting a session.
#[tokio::test]
#[ignore = "requires database"]
async fn test_delete_session() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (user_id, token) = ctx.create_test_user().await;
    let auth = TestContext::auth_header_value(&token);

    let today = Utc::now().date_naive();
    let created: serde_json::Value = server
        .post("/api/sessions")
        .add_header(axum::http::header::AUTHORIZATION, auth.clone())
        .json(&fixtures::create_session_request(today, 30, "Planned"))
        .await
        .json();
    let session_id = created["session"]["id"].as_i64().unwrap();

    server
        .delete(&format!("/api/sessions/{}", session_id))
        .add_header(axum::http::header::AUTHORIZATION, auth.clone())
        .await
        .assert_status_ok();

    let response = server
        .get(&format!("/api/sessions/{}", session_id))
        .add_header(axum::http::header::AUTHORIZATION, auth)
        .await;
    response.assert_status(StatusCode::NOT_FOUND);

    ctx.cleanup_user(user_id).await;
}

/// Test another user's session is indistinguishable from a missing one.
#[tokio::test]
#[ignore = "requires database"]
async fn test_other_users_session_is_not_found() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (owner_id, owner_token) = ctx.create_test_user().await;
    let (other_id, other_token) = ctx.create_test_user().await;

    let today = Utc::now().date_naive();
    let created: serde_json::Value = server
        .post("/api/sessions")
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(&owner_token),
        )
        .json(&fixtures::create_session_request(today, 30, "Planned"))
        .await
        .json();
    let session_id = created["session"]["id"].as_i64().unwrap();

    let response = server
        .get(&format!("/api/sessions/{}", session_id))
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(&other_token),
        )
        .await;

    response.assert_status(StatusCode::NOT_FOUND);

    ctx.cleanup_user(owner_id).await;
    ctx.cleanup_user(other_id).await;
}

/// Test session endpoints require authentication.
#[tokio::test]
#[ignore = "requires database"]
async fn test_sessions_require_auth() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();

    let response = server.get("/api/sessions").await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}
