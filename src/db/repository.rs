use async_trait::async_trait;

use crate::{
    error::AppResult,
    models::{Genre, Movie, MovieFilter, User, UserGenrePreference, UserRating},
};

/// Whether an upsert created a new row or replaced an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upserted {
    Created,
    Updated,
}

/// Storage for movies, users, genre preferences and ratings
///
/// Every write is an upsert keyed on the entity's natural key, so replaying
/// the same writes leaves the store unchanged.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JournoRepository: Send + Sync {
    async fn list_movies(&self) -> AppResult<Vec<Movie>>;
    async fn get_movie(&self, movie_id: &str) -> AppResult<Option<Movie>>;
    async fn upsert_movie(&self, movie: &Movie) -> AppResult<()>;
    /// Movies matching every condition of `filter`, ordered by id
    async fn find_movies(&self, filter: &MovieFilter) -> AppResult<Vec<Movie>>;
    /// Highest baseline ratings first, ties by id
    async fn top_rated_movies(&self, limit: usize) -> AppResult<Vec<Movie>>;

    async fn list_genres(&self) -> AppResult<Vec<Genre>>;
    async fn get_genre(&self, name: &str) -> AppResult<Option<Genre>>;
    async fn upsert_genre(&self, genre: &Genre) -> AppResult<()>;

    async fn list_users(&self) -> AppResult<Vec<User>>;
    async fn upsert_user(&self, user: &User) -> AppResult<()>;

    /// Preferences of every user, used to find interested users
    async fn list_all_user_genres(&self) -> AppResult<Vec<UserGenrePreference>>;
    async fn list_user_genres(&self, user_id: &str) -> AppResult<Vec<UserGenrePreference>>;
    /// Returns `false` when the preference already existed
    async fn add_user_genre(&self, preference: &UserGenrePreference) -> AppResult<bool>;
    /// Returns `false` when there was nothing to remove
    async fn remove_user_genre(&self, user_id: &str, genre: &str) -> AppResult<bool>;

    async fn get_user_rating(&self, user_id: &str, movie_id: &str)
        -> AppResult<Option<UserRating>>;
    /// Inserts the rating or replaces the existing one for the same (user, movie),
    /// keeping the original `created_at`
    async fn upsert_user_rating(&self, rating: &UserRating) -> AppResult<Upserted>;
    async fn list_ratings_for_movie(&self, movie_id: &str) -> AppResult<Vec<UserRating>>;
    async fn list_user_ratings(&self, user_id: &str) -> AppResult<Vec<UserRating>>;
    async fn list_all_ratings(&self) -> AppResult<Vec<UserRating>>;
}
