use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Serialize;
use std::sync::Arc;

use crate::{
    db::Upserted,
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::{SubmitRatingRequest, UserRating},
    routes::AppState,
    services::ratings,
};

#[derive(Debug, Serialize)]
pub struct SubmitRatingResponse {
    pub success: bool,
    pub message: &'static str,
    pub rating: UserRating,
}

/// Handler for rating submission: inserts or replaces the user's rating
///
/// Bodies that do not parse get the same 400 as out-of-range ratings.
pub async fn submit(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    payload: Result<Json<SubmitRatingRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<SubmitRatingResponse>)> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::debug!(request_id = %request_id, error = %rejection, "Rejected rating body");
        AppError::InvalidInput(ratings::INVALID_RATING.to_string())
    })?;

    tracing::info!(
        request_id = %request_id,
        user_id = %request.user_id,
        movie_id = %request.movie_id,
        "Processing rating submission"
    );

    let (outcome, rating) =
        ratings::submit_rating(state.repo.as_ref(), state.cache.as_ref(), request).await?;

    let (status, message) = match outcome {
        Upserted::Created => (StatusCode::CREATED, "Rating saved successfully"),
        Upserted::Updated => (StatusCode::OK, "Rating updated successfully"),
    };

    Ok((
        status,
        Json(SubmitRatingResponse {
            success: true,
            message,
            rating,
        }),
    ))
}

pub async fn list_for_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> AppResult<Json<Vec<UserRating>>> {
    let user_ratings = ratings::ratings_for_user(state.repo.as_ref(), &user_id).await?;
    Ok(Json(user_ratings))
}

/// One user's rating of one movie
pub async fn get_for_user(
    State(state): State<Arc<AppState>>,
    Path((user_id, movie_id)): Path<(String, String)>,
) -> AppResult<Json<UserRating>> {
    let rating = ratings::rating_for(state.repo.as_ref(), &user_id, &movie_id).await?;
    Ok(Json(rating))
}
