use std::sync::Arc;

use axum::{extract::FromRef, routing::get, Router};
use sqlx::sqlite::SqlitePool;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod models;
pub mod routes;

/// Shared per-request state.
#[derive(Clone, FromRef)]
pub struct AppState {
    pub pool: SqlitePool,
    pub api_token: Option<Arc<str>>,
}

impl AppState {
    pub fn new(pool: SqlitePool, api_token: Option<String>) -> Self {
        Self {
            pool,
            api_token: api_token.map(Arc::from),
        }
    }
}

/// Builds the application router.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(|| async { "Player Registry API - v1.0" }))
        .route("/health", get(routes::health::health_check))
        .route("/schema", get(routes::schema::openapi))

        // Player resource
        .route(
            "/players",
            get(routes::players::list_players).post(routes::players::create_player),
        )
        .route(
            "/players/{id}",
            get(routes::players::retrieve_player)
                .put(routes::players::update_player)
                .patch(routes::players::partial_update_player)
                .delete(routes::players::destroy_player),
        )

        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
