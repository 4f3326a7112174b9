use axum::{
    http::StatusCode,
    middleware,
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    db::{Cache, JournoRepository},
    middleware::request_id::{make_span_with_request_id, request_id_middleware},
};

pub mod graph;
pub mod movies;
pub mod preferences;
pub mod ratings;
pub mod scores;
pub mod seed;

/// Shared handler state
pub struct AppState {
    pub repo: Arc<dyn JournoRepository>,
    pub cache: Option<Cache>,
    /// Seconds a cached score stays valid
    pub score_cache_ttl: u64,
}

impl AppState {
    pub fn new(repo: Arc<dyn JournoRepository>, cache: Option<Cache>, score_cache_ttl: u64) -> Self {
        Self {
            repo,
            cache,
            score_cache_ttl,
        }
    }
}

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .with_state(state)
        .layer(
            // Request IDs are assigned before the trace span is opened
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
}

/// API routes under /api/v1
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/movies", get(movies::list))
        .route("/movies/top", get(movies::top))
        .route("/movies/:movie_id", get(movies::get))
        .route("/genres", get(preferences::list_genres))
        .route("/users", get(preferences::list_users))
        .route("/users/:user_id/ratings", get(ratings::list_for_user))
        .route("/users/:user_id/ratings/:movie_id", get(ratings::get_for_user))
        .route("/users/:user_id/recommended-movies", get(movies::recommended))
        .route(
            "/users/:user_id/genres",
            get(preferences::list).post(preferences::add),
        )
        .route("/users/:user_id/genres/:genre", delete(preferences::remove))
        .route("/user-ratings", post(ratings::submit))
        .route("/journo-scores", get(scores::list))
        .route("/journo-scores/:movie_id", get(scores::get))
        .route("/graph-data", get(graph::get))
        .route("/seed", post(seed::seed))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
