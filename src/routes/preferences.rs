use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use std::sync::Arc;

use crate::{
    error::AppResult,
    middleware::request_id::RequestId,
    models::{AddGenreRequest, Genre, User, UserGenrePreference},
    routes::AppState,
    services::preferences,
};

pub async fn list_genres(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<Genre>>> {
    let genres = preferences::genres(state.repo.as_ref()).await?;
    Ok(Json(genres))
}

pub async fn list_users(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<User>>> {
    let users = state.repo.list_users().await?;
    Ok(Json(users))
}

/// Genres a user likes
pub async fn list(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> AppResult<Json<Vec<UserGenrePreference>>> {
    let genres = preferences::user_genres(state.repo.as_ref(), &user_id).await?;
    Ok(Json(genres))
}

/// Adds a liked genre; 201 when new, 200 when it was already there
pub async fn add(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Path(user_id): Path<String>,
    Json(request): Json<AddGenreRequest>,
) -> AppResult<(StatusCode, Json<UserGenrePreference>)> {
    tracing::info!(
        request_id = %request_id,
        user_id = %user_id,
        genre = %request.genre,
        "Adding genre preference"
    );

    let created = preferences::add_user_genre(
        state.repo.as_ref(),
        state.cache.as_ref(),
        &user_id,
        &request.genre,
    )
    .await?;

    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((
        status,
        Json(UserGenrePreference::new(user_id.trim(), request.genre.trim())),
    ))
}

pub async fn remove(
    State(state): State<Arc<AppState>>,
    Path((user_id, genre)): Path<(String, String)>,
) -> AppResult<StatusCode> {
    preferences::remove_user_genre(state.repo.as_ref(), state.cache.as_ref(), &user_id, &genre)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
