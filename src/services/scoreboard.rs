use crate::{
    cached,
    db::{Cache, CacheKey, JournoRepository},
    error::{AppError, AppResult},
    models::ScoredMovie,
    services::journo_score,
};

/// Every movie with its recomputed journo score, highest first
///
/// Served from the cache when one is configured and holds a fresh copy.
pub async fn journo_scores(
    repo: &dyn JournoRepository,
    cache: Option<&Cache>,
    ttl: u64,
) -> AppResult<Vec<ScoredMovie>> {
    match cache {
        Some(cache) => cached!(cache, CacheKey::JournoScores, ttl, compute_scoreboard(repo)),
        None => compute_scoreboard(repo).await,
    }
}

/// Journo score of one movie
pub async fn journo_score_for_movie(
    repo: &dyn JournoRepository,
    cache: Option<&Cache>,
    ttl: u64,
    movie_id: &str,
) -> AppResult<ScoredMovie> {
    let key = CacheKey::MovieScore(movie_id.to_string());
    match cache {
        Some(cache) => cached!(cache, key, ttl, compute_movie_score(repo, movie_id)),
        None => compute_movie_score(repo, movie_id).await,
    }
}

async fn compute_scoreboard(repo: &dyn JournoRepository) -> AppResult<Vec<ScoredMovie>> {
    let movies = repo.list_movies().await?;
    let preferences = repo.list_all_user_genres().await?;
    let ratings = repo.list_all_ratings().await?;

    tracing::info!(
        movies = movies.len(),
        preferences = preferences.len(),
        ratings = ratings.len(),
        "Computing journo scores"
    );

    Ok(journo_score::score_movies(movies, &preferences, &ratings))
}

async fn compute_movie_score(
    repo: &dyn JournoRepository,
    movie_id: &str,
) -> AppResult<ScoredMovie> {
    let movie = repo
        .get_movie(movie_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Movie {} not found", movie_id)))?;
    let preferences = repo.list_all_user_genres().await?;
    let ratings = repo.list_ratings_for_movie(movie_id).await?;

    let scored = journo_score::score_movie(movie, &preferences, &ratings);

    tracing::debug!(
        movie_id = %movie_id,
        new_rating = scored.new_rating,
        relevant = scored.rating_analytics.total_relevant_ratings,
        "Computed journo score"
    );

    Ok(scored)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::MockJournoRepository;
    use crate::models::{Movie, UserGenrePreference, UserRating};

    fn matrix() -> Movie {
        Movie::new("movie006", "The Matrix", &["Action", "SciFi"], 8.4)
    }

    #[tokio::test]
    async fn test_journo_scores_without_cache() {
        let mut repo = MockJournoRepository::new();
        repo.expect_list_movies().times(1).returning(|| {
            Ok(vec![
                matrix(),
                Movie::new("movie007", "Forrest Gump", &["Drama", "Romance"], 8.6),
            ])
        });
        repo.expect_list_all_user_genres().times(1).returning(|| {
            Ok(vec![
                UserGenrePreference::new("user003", "Action"),
                UserGenrePreference::new("user003", "SciFi"),
            ])
        });
        repo.expect_list_all_ratings()
            .times(1)
            .returning(|| Ok(vec![UserRating::new("user003", "movie006", 10)]));

        let scores = journo_scores(&repo, None, 60).await.unwrap();

        assert_eq!(scores.len(), 2);
        assert_eq!(scores[0].movie.movie_id, "movie006");
        assert_eq!(scores[0].new_rating, 10.0);
        assert_eq!(scores[1].movie.movie_id, "movie007");
        assert_eq!(scores[1].new_rating, 8.6);
    }

    #[tokio::test]
    async fn test_journo_score_for_unknown_movie() {
        let mut repo = MockJournoRepository::new();
        repo.expect_get_movie()
            .withf(|id| id == "movie999")
            .returning(|_| Ok(None));

        let err = journo_score_for_movie(&repo, None, 60, "movie999")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_journo_score_for_movie_uses_movie_ratings() {
        let mut repo = MockJournoRepository::new();
        repo.expect_get_movie().returning(|_| Ok(Some(matrix())));
        repo.expect_list_all_user_genres().returning(|| {
            Ok(vec![
                UserGenrePreference::new("userA", "Action"),
                UserGenrePreference::new("userB", "Action"),
                UserGenrePreference::new("userB", "SciFi"),
            ])
        });
        repo.expect_list_ratings_for_movie()
            .withf(|id| id == "movie006")
            .returning(|_| {
                Ok(vec![
                    UserRating::new("userA", "movie006", 9),
                    UserRating::new("userB", "movie006", 7),
                ])
            });

        let scored = journo_score_for_movie(&repo, None, 60, "movie006")
            .await
            .unwrap();

        assert_eq!(scored.new_rating, 7.67);
        assert_eq!(scored.rating_analytics.total_relevant_ratings, 2);
        assert_eq!(scored.rating_analytics.average_rating_from_interested_users, Some(8.0));
    }
}
