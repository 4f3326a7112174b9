use axum::{extract::State, Extension, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::{
    error::AppResult, middleware::request_id::RequestId, models::SeedStats, routes::AppState,
    services::seed,
};

#[derive(Debug, Serialize)]
pub struct SeedResponse {
    pub success: bool,
    pub message: &'static str,
    pub stats: SeedStats,
}

/// Loads the sample dataset
pub async fn seed(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
) -> AppResult<Json<SeedResponse>> {
    tracing::info!(request_id = %request_id, "Seeding sample dataset");

    let stats = seed::seed_database(state.repo.as_ref(), state.cache.as_ref()).await?;

    Ok(Json(SeedResponse {
        success: true,
        message: "Database seeded successfully",
        stats,
    }))
}
