use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{Movie, MovieFilter},
    routes::AppState,
    services::catalog,
};

#[derive(Debug, Default, Deserialize)]
pub struct MovieQuery {
    genre: Option<String>,
    min_rating: Option<f64>,
    q: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TopQuery {
    limit: Option<usize>,
}

/// Lists movies with their baseline rating, optionally filtered by genre,
/// minimum rating and a name/description search
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(params): Query<MovieQuery>,
) -> AppResult<Json<Vec<Movie>>> {
    let filter = MovieFilter {
        genres: params.genre.into_iter().collect(),
        min_rating: params.min_rating,
        query: params.q,
    };
    let movies = catalog::find_movies(state.repo.as_ref(), filter).await?;
    Ok(Json(movies))
}

/// Highest baseline ratings first
pub async fn top(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TopQuery>,
) -> AppResult<Json<Vec<Movie>>> {
    let movies = catalog::top_rated(state.repo.as_ref(), params.limit).await?;
    Ok(Json(movies))
}

pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(movie_id): Path<String>,
) -> AppResult<Json<Movie>> {
    state
        .repo
        .get_movie(&movie_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Movie {} not found", movie_id)))
}

/// Movies in any genre the user likes
pub async fn recommended(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> AppResult<Json<Vec<Movie>>> {
    let movies = catalog::recommended_for_user(state.repo.as_ref(), &user_id).await?;
    Ok(Json(movies))
}
