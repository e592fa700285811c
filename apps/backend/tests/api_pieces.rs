//! Piece API tests.
//!
//! These tests require a running PostgreSQL database.
//! Set DATABASE_URL before running.

mod common;

use axum::http::StatusCode;
use axum_test::TestServer;
use chrono::Utc;

use common::fixtures;
use common::TestContext;

/// Test creating and listing pieces.
#[tokio::test]
#[ignore = "requires database"]
async fn test_create_and_list_pieces() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (user_id, token) = ctx.create_test_user().await;
    let auth = TestContext::auth_header_value(&token);

    let response = server
        .post("/api/pieces")
        .add_header(axum::http::header::AUTHORIZATION, auth.clone())
        .json(&fixtures::create_piece_request(
            "Prelude in C Major",
            "Johann Sebastian Bach",
            "In Training",
        ))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["piece"]["play_counter"].as_i64(), Some(0));
    assert!(body["piece"]["last_played_date"].is_null());

    let response = server
        .get("/api/pieces")
        .add_header(axum::http::header::AUTHORIZATION, auth)
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    let pieces = body["pieces"].as_array().unwrap();
    assert_eq!(pieces.len(), 1);
    assert_eq!(pieces[0]["composer"].as_str(), Some("Johann Sebastian Bach"));

    ctx.cleanup_user(user_id).await;
}

/// Test field length validation on create.
#[tokio::test]
#[ignore = "requires database"]
async fn test_create_piece_validation() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (user_id, token) = ctx.create_test_user().await;
    let auth = TestContext::auth_header_value(&token);

    // Empty name
    let response = server
        .post("/api/pieces")
        .add_header(axum::http::header::AUTHORIZATION, auth.clone())
        .json(&fixtures::create_piece_request("", "Bach", "In Training"))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    // Composer too long
    let response = server
        .post("/api/pieces")
        .add_header(axum::http::header::AUTHORIZATION, auth.clone())
        .json(&fixtures::create_piece_request(
            "Etude",
            &"x".repeat(101),
            "In Training",
        ))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    // Negative play count
    let response = server
        .post("/api/pieces")
        .add_header(axum::http::header::AUTHORIZATION, auth)
        .json(&serde_json::json!({
            "name": "Etude",
            "composer": "Chopin",
            "status": "In Training",
            "play_count": -1,
        }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    ctx.cleanup_user(user_id).await;
}

/// Test fetching a missing piece returns not found.
#[tokio::test]
#[ignore = "requires database"]
async fn test_get_piece_not_found() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (user_id, token) = ctx.create_test_user().await;

    let response = server
        .get("/api/pieces/999999")
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(&token),
        )
        .await;

    response.assert_status(StatusCode::NOT_FOUND);

    ctx.cleanup_user(user_id).await;
}

/// Test another user's piece is indistinguishable from a missing one.
#[tokio::test]
#[ignore = "requires database"]
async fn test_other_users_piece_is_not_found() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (owner_id, owner_token) = ctx.create_test_user().await;
    let (other_id, other_token) = ctx.create_test_user().await;

    let created: serde_json::Value = server
        .post("/api/pieces")
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(&owner_token),
        )
        .json(&fixtures::create_piece_request("Nocturne", "Chopin", "Repertoire"))
        .await
        .json();
    let piece_id = created["piece"]["id"].as_i64().unwrap();

    let response = server
        .get(&format!("/api/pieces/{}", piece_id))
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(&other_token),
        )
        .await;

    response.assert_status(StatusCode::NOT_FOUND);

    ctx.cleanup_user(owner_id).await;
    ctx.cleanup_user(other_id).await;
}

/// Test patch updates change only the provided fields.
#[tokio::test]
#[ignore = "requires database"]
async fn test_update_piece_patch() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (user_id, token) = ctx.create_test_user().await;
    let auth = TestContext::auth_header_value(&token);

    let created: serde_json::Value = server
        .post("/api/pieces")
        .add_header(axum::http::header::AUTHORIZATION, auth.clone())
        .json(&fixtures::create_piece_request("Minute Waltz", "Chopin", "In Training"))
        .await
        .json();
    let piece_id = created["piece"]["id"].as_i64().unwrap();

    server
        .put(&format!("/api/pieces/{}", piece_id))
        .add_header(axum::http::header::AUTHORIZATION, auth.clone())
        .json(&serde_json::json!({ "status": "Repertoire" }))
        .await
        .assert_status_ok();

    let body: serde_json::Value = server
        .get(&format!("/api/pieces/{}", piece_id))
        .add_header(axum::http::header::AUTHORIZATION, auth.clone())
        .await
        .json();
    assert_eq!(body["piece"]["status"].as_str(), Some("Repertoire"));
    assert_eq!(body["piece"]["name"].as_str(), Some("Minute Waltz"));
    assert_eq!(body["piece"]["composer"].as_str(), Some("Chopin"));

    // Empty patch is rejected
    let response = server
        .put(&format!("/api/pieces/{}", piece_id))
        .add_header(axum::http::header::AUTHORIZATION, auth)
        .json(&serde_json::json!({}))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    ctx.cleanup_user(user_id).await;
}

/// Test pieces-by-status validation and filtering.
#[tokio::test]
#[ignore = "requires database"]
async fn test_pieces_by_status() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (user_id, token) = ctx.create_test_user().await;
    let auth = TestContext::auth_header_value(&token);

    server
        .post("/api/pieces")
        .add_header(axum::http::header::AUTHORIZATION, auth.clone())
        .json(&fixtures::create_piece_request("Invention No. 1", "Bach", "Repertoire"))
        .await
        .assert_status(StatusCode::CREATED);
    server
        .post("/api/pieces")
        .add_header(axum::http::header::AUTHORIZATION, auth.clone())
        .json(&fixtures::create_piece_request("Arabesque No. 1", "Debussy", "In Training"))
        .await
        .assert_status(StatusCode::CREATED);

    let response = server
        .get("/api/pieces/status/Repertoire")
        .add_header(axum::http::header::AUTHORIZATION, auth.clone())
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    let pieces = body["pieces"].as_array().unwrap();
    assert_eq!(pieces.len(), 1);
    assert_eq!(pieces[0]["name"].as_str(), Some("Invention No. 1"));

    let response = server
        .get("/api/pieces/status/Archived")
        .add_header(axum::http::header::AUTHORIZATION, auth)
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    ctx.cleanup_user(user_id).await;
}

/// Test marking a piece as played bumps the counter and the date.
#[tokio::test]
#[ignore = "requires database"]
async fn test_play_increments_counter() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (user_id, token) = ctx.create_test_user().await;
    let auth = TestContext::auth_header_value(&token);

    let created: serde_json::Value = server
        .post("/api/pieces")
        .add_header(axum::http::header::AUTHORIZATION, auth.clone())
        .json(&fixtures::create_piece_request("Gymnopedie No. 1", "Satie", "Repertoire"))
        .await
        .json();
    let piece_id = created["piece"]["id"].as_i64().unwrap();

    for _ in 0..2 {
        server
            .post(&format!("/api/pieces/{}/play", piece_id))
            .add_header(axum::http::header::AUTHORIZATION, auth.clone())
            .await
            .assert_status_ok();
    }

    let body: serde_json::Value = server
        .get(&format!("/api/pieces/{}", piece_id))
        .add_header(axum::http::header::AUTHORIZATION, auth)
        .await
        .json();
    assert_eq!(body["piece"]["play_counter"].as_i64(), Some(2));
    assert_eq!(
        body["piece"]["last_played_date"].as_str(),
        Some(Utc::now().date_naive().to_string().as_str())
    );

    ctx.cleanup_user(user_id).await;
}

/// Test deleting a piece.
#[tokio::test]
#[ignore = "requires database"]
async fn test_delete_piece() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (user_id, token) = ctx.create_test_user().await;
    let auth = TestContext::auth_header_value(&token);

    let created: serde_json::Value = server
        .post("/api/pieces")
        .add_header(axum::http::header::AUTHORIZATION, auth.clone())
        .json(&fixtures::create_piece_request("Etude Op. 10 No. 1", "Chopin", "In Training"))
        .await
        .json();
    let piece_id = created["piece"]["id"].as_i64().unwrap();

    server
        .delete(&format!("/api/pieces/{}", piece_id))
        .add_header(axum::http::header::AUTHORIZATION, auth.clone())
        .await
        .assert_status_ok();

    let response = server
        .get(&format!("/api/pieces/{}", piece_id))
        .add_header(axum::http::header::AUTHORIZATION, auth)
        .await;
    response.assert_status(StatusCode::NOT_FOUND);

    ctx.cleanup_user(user_id).await;
}

/// Test piece endpoints require authentication.
#[tokio::test]
#[ignore = "requires database"]
async fn test_pieces_require_auth() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();

    let response = server.get("/api/pieces").await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}
