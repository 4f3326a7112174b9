use crate::{
    db::{Cache, CacheKey, JournoRepository},
    error::{AppError, AppResult},
    models::{Genre, UserGenrePreference},
    services::invalidate_scores,
};

/// Genres the user likes
pub async fn user_genres(
    repo: &dyn JournoRepository,
    user_id: &str,
) -> AppResult<Vec<UserGenrePreference>> {
    repo.list_user_genres(user_id).await
}

/// The genre catalog
pub async fn genres(repo: &dyn JournoRepository) -> AppResult<Vec<Genre>> {
    repo.list_genres().await
}

/// Records that a user likes a genre
///
/// The genre must be in the catalog. Returns `false` when the user already
/// liked it.
pub async fn add_user_genre(
    repo: &dyn JournoRepository,
    cache: Option<&Cache>,
    user_id: &str,
    genre: &str,
) -> AppResult<bool> {
    let user_id = user_id.trim();
    let genre = genre.trim();
    if user_id.is_empty() || genre.is_empty() {
        return Err(AppError::InvalidInput(
            "User id and genre must not be empty".to_string(),
        ));
    }

    if repo.get_genre(genre).await?.is_none() {
        return Err(AppError::InvalidInput(format!("Unknown genre: {}", genre)));
    }

    let created = repo
        .add_user_genre(&UserGenrePreference::new(user_id, genre))
        .await?;

    if created {
        tracing::info!(user_id = %user_id, genre = %genre, "Added genre preference");
        invalidate_genre(repo, cache, genre).await;
    }

    Ok(created)
}

/// Removes a genre from a user's preferences, `NotFound` if it was not there
pub async fn remove_user_genre(
    repo: &dyn JournoRepository,
    cache: Option<&Cache>,
    user_id: &str,
    genre: &str,
) -> AppResult<()> {
    let user_id = user_id.trim();
    let genre = genre.trim();
    if !repo.remove_user_genre(user_id, genre).await? {
        return Err(AppError::NotFound(format!(
            "User {} has no preference for {}",
            user_id, genre
        )));
    }

    tracing::info!(user_id = %user_id, genre = %genre, "Removed genre preference");
    invalidate_genre(repo, cache, genre).await;

    Ok(())
}

/// Drops cached scores touched by `genre`. Failures are logged, the
/// preference change itself is already stored.
async fn invalidate_genre(repo: &dyn JournoRepository, cache: Option<&Cache>, genre: &str) {
    if cache.is_none() {
        return;
    }

    match affected_keys(repo, genre).await {
        Ok(keys) => invalidate_scores(cache, &keys).await,
        Err(e) => {
            tracing::warn!(error = %e, genre = %genre, "Failed to collect cached scores to invalidate")
        }
    }
}

/// Cache entries whose score can change when someone's liking of `genre` changes
async fn affected_keys(repo: &dyn JournoRepository, genre: &str) -> AppResult<Vec<CacheKey>> {
    let mut keys = vec![CacheKey::JournoScores];
    keys.extend(
        repo.list_movies()
            .await?
            .into_iter()
            .filter(|m| m.genres.iter().any(|g| g == genre))
            .map(|m| CacheKey::MovieScore(m.movie_id)),
    );
    Ok(keys)
}
