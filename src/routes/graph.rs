use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::{error::AppResult, models::GraphData, routes::AppState, services::graph};

#[derive(Debug, Serialize)]
pub struct GraphResponse {
    pub success: bool,
    pub data: GraphData,
}

pub async fn get(State(state): State<Arc<AppState>>) -> AppResult<Json<GraphResponse>> {
    let data = graph::catalog_graph(state.repo.as_ref()).await?;
    Ok(Json(GraphResponse {
        success: true,
        data,
    }))
}
