use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Serialize;
use std::sync::Arc;

use crate::{
    error::AppResult,
    middleware::request_id::RequestId,
    models::ScoredMovie,
    routes::AppState,
    services::scoreboard,
};

#[derive(Debug, Serialize)]
pub struct ScoreboardResponse {
    pub success: bool,
    pub count: usize,
    pub data: Vec<ScoredMovie>,
}

/// Every movie with its genre-weighted journo score, highest first
pub async fn list(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
) -> AppResult<Json<ScoreboardResponse>> {
    let data = scoreboard::journo_scores(
        state.repo.as_ref(),
        state.cache.as_ref(),
        state.score_cache_ttl,
    )
    .await?;

    tracing::info!(request_id = %request_id, count = data.len(), "Journo scores served");

    Ok(Json(ScoreboardResponse {
        success: true,
        count: data.len(),
        data,
    }))
}

pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(movie_id): Path<String>,
) -> AppResult<Json<ScoredMovie>> {
    let scored = scoreboard::journo_score_for_movie(
        state.repo.as_ref(),
        state.cache.as_ref(),
        state.score_cache_ttl,
        &movie_id,
    )
    .await?;
    Ok(Json(scored))
}
