pub mod db;
pub mod error;
pub mod models;
pub mod routes;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::db::Database;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
}

/// Build the full application router
pub fn app_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        // User routes
        .route("/api/users/profile", get(routes::users::profile))
        .route("/api/users/profile", put(routes::users::update_profile))
        .route("/api/users/preferences", get(routes::users::get_preferences))
        .route("/api/users/preferences", put(routes::users::update_preferences))
        .route("/api/users/activity", get(routes::users::activity))
        .route("/api/users/profile/summary", get(routes::users::profile_summary))
        .route("/api/users/export", get(routes::users::export))
        .route("/api/users/account", delete(routes::users::delete_account))
        // Piece routes
        .route("/api/pieces", get(routes::pieces::list))
        .route("/api/pieces", post(routes::pieces::create))
        .route("/api/pieces/status/{status}", get(routes::pieces::by_status))
        .route("/api/pieces/{id}", get(routes::pieces::get_by_id))
        .route("/api/pieces/{id}", put(routes::pieces::update))
        .route("/api/pieces/{id}", delete(routes::pieces::delete))
        .route("/api/pieces/{id}/play", post(routes::pieces::play))
        // Exercise routes
        .route("/api/exercises", get(routes::exercises::list))
        .route("/api/exercises", post(routes::exercises::create))
        .route("/api/exercises/{id}", get(routes::exercises::get_by_id))
        .route("/api/exercises/{id}", put(routes::exercises::update))
        .route("/api/exercises/{id}", delete(routes::exercises::delete))
        .route("/api/exercises/{id}/practice", post(routes::exercises::practice))
        // Session routes
        .route("/api/sessions", get(routes::sessions::list))
        .route("/api/sessions", post(routes::sessions::create))
        .route("/api/sessions/range/{from}/{to}", get(routes::sessions::range))
        .route("/api/sessions/{id}", get(routes::sessions::get_by_id))
        .route("/api/sessions/{id}", put(routes::sessions::update))
        .route("/api/sessions/{id}", delete(routes::sessions::delete))
        // Statistics routes
        .route("/api/statistics/dashboard", get(routes::statistics::dashboard))
        .route("/api/statistics/practice/{days}", get(routes::statistics::practice))
        .route("/api/statistics/pieces", get(routes::statistics::pieces))
        .route("/api/statistics/exercises", get(routes::statistics::exercises))
        .route("/api/statistics/monthly/{year}/{month}", get(routes::statistics::monthly))
        .route("/api/statistics/streak", get(routes::statistics::streak))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            routes::auth::auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/api/users/register", post(routes::users::register))
        .merge(protected_routes)
        .with_state(state)
}

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Connect to database
    let database_url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set");

    tracing::info!("Connecting to database...");
    let db = Database::connect(&database_url).await?;

    tracing::info!("Running migrations...");
    db.run_migrations().await?;

    let state = AppState {
        db: Arc::new(db),
    };

    let app = app_router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("{}:{}", host, port);

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}
