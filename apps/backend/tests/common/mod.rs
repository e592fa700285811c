//! Common test utilities and fixtures for integration tests.
//!
//! This module provides shared test infrastructure including:
//! - TestContext for setting up test environment with database
//! - Helper functions for creating test data
//! - Authentication helpers
//!
//! # Requirements
//! Integration tests require a PostgreSQL database (set DATABASE_URL env var).

pub mod fixtures;

use std::sync::Arc;

use axum::Router;
use uuid::Uuid;

use con_bravura_backend::db::Database;
use con_bravura_backend::models::User;
use con_bravura_backend::{app_router, AppState};

/// Test context containing database connection and test server.
///
/// Use this to set up integration tests with a real database connection.
/// Requires DATABASE_URL environment variable to be set.
pub struct TestContext {
    pub db: Arc<Database>,
    app: Router,
}

impl TestContext {
    /// Create a new test context.
    ///
    /// # Panics
    /// Panics if DATABASE_URL is not set or database connection fails.
    pub async fn new() -> Self {
        dotenvy::dotenv().ok();

        let database_url =
            std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for integration tests");

        let db = Database::connect(&database_url)
            .await
            .expect("Failed to connect to test database");

        db.run_migrations()
            .await
            .expect("Failed to run migrations");

        let db = Arc::new(db);

        let state = AppState { db: db.clone() };
        let app = app_router(state);

        Self { db, app }
    }

    /// Get the router for use with axum-test.
    pub fn router(&self) -> Router {
        self.app.clone()
    }

    /// Create a test user and return its ID and token.
    pub async fn create_test_user(&self) -> (Uuid, String) {
        let username = fixtures::unique_username("testuser");
        let email = format!("{}@example.com", username);
        let user = self
            .db
            .create_user(&username, &email, None, None)
            .await
            .expect("Failed to create test user");
        (user.id, user.token)
    }

    /// Get a user by token.
    pub async fn get_user_by_token(&self, token: &str) -> Option<User> {
        self.db.get_user_by_token(token).await.ok().flatten()
    }

    /// Format authorization header value.
    pub fn auth_header_value(token: &str) -> String {
        format!("Bearer {}", token)
    }

    /// Clean up test data for a user.
    ///
    /// Call this after tests to remove test data.
    pub async fn cleanup_user(&self, user_id: Uuid) {
        // Join rows cascade from sessions/pieces/exercises
        let _ = sqlx::query("DELETE FROM practice_statistics WHERE user_id = $1")
            .bind(user_id)
            .execute(self.db.pool())
            .await;

        let _ = sqlx::query("DELETE FROM practice_sessions WHERE user_id = $1")
            .bind(user_id)
            .execute(self.db.pool())
            .await;

        let _ = sqlx::query("DELETE FROM pieces WHERE user_id = $1")
            .bind(user_id)
            .execute(self.db.pool())
            .await;

        let _ = sqlx::query("DELETE FROM exercises WHERE user_id = $1")
            .bind(user_id)
            .execute(self.db.pool())
            .await;

        let _ = sqlx::query("DELETE FROM user_preferences WHERE user_id = $1")
            .bind(user_id)
            .execute(self.db.pool())
            .await;

        let _ = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(self.db.pool())
            .await;
    }
}
