use chrono::Utc;

use crate::{
    db::{Cache, CacheKey, JournoRepository, Upserted},
    error::{AppError, AppResult},
    models::{default_review, SubmitRatingRequest, UserRating, MAX_RATING, MIN_RATING},
    services::invalidate_scores,
};

pub const INVALID_RATING: &str = "Invalid rating data. Rating must be between 1-10.";

/// Checks a submission and converts the score to its stored width
fn validate(request: &SubmitRatingRequest) -> AppResult<i16> {
    if request.user_id.trim().is_empty() || request.movie_id.trim().is_empty() {
        return Err(AppError::InvalidInput(INVALID_RATING.to_string()));
    }

    i16::try_from(request.rating)
        .ok()
        .filter(|r| (MIN_RATING..=MAX_RATING).contains(r))
        .ok_or_else(|| AppError::InvalidInput(INVALID_RATING.to_string()))
}

/// Stores a user's rating of a movie, replacing any earlier one
///
/// The earlier rating's `created_at` is kept. Cached scores for the movie and
/// the scoreboard are dropped.
pub async fn submit_rating(
    repo: &dyn JournoRepository,
    cache: Option<&Cache>,
    request: SubmitRatingRequest,
) -> AppResult<(Upserted, UserRating)> {
    let score = validate(&request)?;
    let user_id = request.user_id.trim();
    let movie_id = request.movie_id.trim();

    if repo.get_movie(movie_id).await?.is_none() {
        return Err(AppError::NotFound(format!("Movie {} not found", movie_id)));
    }

    let now = Utc::now();
    let created_at = repo
        .get_user_rating(user_id, movie_id)
        .await?
        .map(|existing| existing.created_at)
        .unwrap_or(now);

    let rating = UserRating {
        user_id: user_id.to_string(),
        movie_id: movie_id.to_string(),
        rating: score,
        review: request
            .review
            .filter(|r| !r.trim().is_empty())
            .unwrap_or_else(|| default_review(score)),
        emotion: request.emotion,
        verified: request.verified,
        created_at,
        updated_at: now,
    };

    let outcome = repo.upsert_user_rating(&rating).await?;

    match outcome {
        Upserted::Created => {
            tracing::info!(user_id = %user_id, movie_id = %movie_id, rating = score, "Created new rating")
        }
        Upserted::Updated => {
            tracing::info!(user_id = %user_id, movie_id = %movie_id, rating = score, "Updated rating")
        }
    }

    invalidate_scores(
        cache,
        &[
            CacheKey::JournoScores,
            CacheKey::MovieScore(movie_id.to_string()),
        ],
    )
    .await;

    Ok((outcome, rating))
}

/// All ratings a user has given
pub async fn ratings_for_user(
    repo: &dyn JournoRepository,
    user_id: &str,
) -> AppResult<Vec<UserRating>> {
    repo.list_user_ratings(user_id).await
}

/// A single rating, `NotFound` when the user never rated the movie
pub async fn rating_for(
    repo: &dyn JournoRepository,
    user_id: &str,
    movie_id: &str,
) -> AppResult<UserRating> {
    repo.get_user_rating(user_id.trim(), movie_id.trim())
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "User {} has not rated movie {}",
                user_id, movie_id
            ))
        })
}
