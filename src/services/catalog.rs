use crate::{
    db::JournoRepository,
    error::{AppError, AppResult},
    models::{Movie, MovieFilter},
};

/// Default size of the top-rated list
pub const DEFAULT_TOP_LIMIT: usize = 10;
/// Largest top-rated list served in one response
pub const MAX_TOP_LIMIT: usize = 100;

/// Movies matching the filter. Blank text conditions are ignored.
pub async fn find_movies(
    repo: &dyn JournoRepository,
    filter: MovieFilter,
) -> AppResult<Vec<Movie>> {
    if filter.min_rating.is_some_and(|r| !r.is_finite()) {
        return Err(AppError::InvalidInput(
            "min_rating must be a finite number".to_string(),
        ));
    }

    let filter = MovieFilter {
        genres: filter
            .genres
            .iter()
            .map(|g| g.trim())
            .filter(|g| !g.is_empty())
            .map(str::to_string)
            .collect(),
        min_rating: filter.min_rating,
        query: filter
            .query
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_string),
    };

    let movies = repo.find_movies(&filter).await?;
    tracing::debug!(?filter, found = movies.len(), "Filtered movie catalog");
    Ok(movies)
}

/// The `limit` movies with the highest baseline rating
pub async fn top_rated(
    repo: &dyn JournoRepository,
    limit: Option<usize>,
) -> AppResult<Vec<Movie>> {
    let limit = limit.unwrap_or(DEFAULT_TOP_LIMIT);
    if !(1..=MAX_TOP_LIMIT).contains(&limit) {
        return Err(AppError::InvalidInput(format!(
            "limit must be between 1 and {}",
            MAX_TOP_LIMIT
        )));
    }
    repo.top_rated_movies(limit).await
}

/// Movies in at least one genre the user likes
///
/// A user without preferences gets an empty list, not the whole catalog.
pub async fn recommended_for_user(
    repo: &dyn JournoRepository,
    user_id: &str,
) -> AppResult<Vec<Movie>> {
    let genres: Vec<String> = repo
        .list_user_genres(user_id.trim())
        .await?
        .into_iter()
        .map(|p| p.genre)
        .collect();

    if genres.is_empty() {
        return Ok(Vec::new());
    }

    repo.find_movies(&MovieFilter {
        genres,
        ..MovieFilter::default()
    })
    .await
}
