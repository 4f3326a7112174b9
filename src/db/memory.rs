use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::repository::{JournoRepository, Upserted};
use crate::{
    error::AppResult,
    models::{Genre, Movie, MovieFilter, User, UserGenrePreference, UserRating},
};

/// In-process repository, used for `STORAGE=memory` and in tests
#[derive(Clone, Default)]
pub struct MemoryRepository {
    inner: Arc<RwLock<MemoryRepositoryInner>>,
}

#[derive(Default)]
struct MemoryRepositoryInner {
    movies: BTreeMap<String, Movie>,
    genres: BTreeMap<String, Genre>,
    users: BTreeMap<String, User>,
    user_genres: BTreeSet<(String, String)>,
    /// Keyed by (movie_id, user_id) so per-movie scans are range lookups
    ratings: BTreeMap<(String, String), UserRating>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl JournoRepository for MemoryRepository {
    async fn list_movies(&self) -> AppResult<Vec<Movie>> {
        let inner = self.inner.read().await;
        Ok(inner.movies.values().cloned().collect())
    }

    async fn get_movie(&self, movie_id: &str) -> AppResult<Option<Movie>> {
        let inner = self.inner.read().await;
        Ok(inner.movies.get(movie_id).cloned())
    }

    async fn upsert_movie(&self, movie: &Movie) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        inner.movies.insert(movie.movie_id.clone(), movie.clone());
        Ok(())
    }

    async fn find_movies(&self, filter: &MovieFilter) -> AppResult<Vec<Movie>> {
        let inner = self.inner.read().await;
        Ok(inner
            .movies
            .values()
            .filter(|m| filter.matches(m))
            .cloned()
            .collect())
    }

    async fn top_rated_movies(&self, limit: usize) -> AppResult<Vec<Movie>> {
        let inner = self.inner.read().await;
        let mut movies: Vec<Movie> = inner.movies.values().cloned().collect();
        // Stable sort keeps id order among equal ratings
        movies.sort_by(|a, b| b.journo_rating.total_cmp(&a.journo_rating));
        movies.truncate(limit);
        Ok(movies)
    }

    async fn list_genres(&self) -> AppResult<Vec<Genre>> {
        let inner = self.inner.read().await;
        Ok(inner.genres.values().cloned().collect())
    }

    async fn get_genre(&self, name: &str) -> AppResult<Option<Genre>> {
        let inner = self.inner.read().await;
        Ok(inner.genres.get(name).cloned())
    }

    async fn upsert_genre(&self, genre: &Genre) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        inner.genres.insert(genre.name.clone(), genre.clone());
        Ok(())
    }

    async fn list_users(&self) -> AppResult<Vec<User>> {
        let inner = self.inner.read().await;
        Ok(inner.users.values().cloned().collect())
    }

    async fn upsert_user(&self, user: &User) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        inner.users.insert(user.user_id.clone(), user.clone());
        Ok(())
    }

    async fn list_all_user_genres(&self) -> AppResult<Vec<UserGenrePreference>> {
        let inner = self.inner.read().await;
        Ok(inner
            .user_genres
            .iter()
            .map(|(user_id, genre)| UserGenrePreference::new(user_id, genre))
            .collect())
    }

    async fn list_user_genres(&self, user_id: &str) -> AppResult<Vec<UserGenrePreference>> {
        let inner = self.inner.read().await;
        Ok(inner
            .user_genres
            .iter()
            .filter(|(uid, _)| uid == user_id)
            .map(|(uid, genre)| UserGenrePreference::new(uid, genre))
            .collect())
    }

    async fn add_user_genre(&self, preference: &UserGenrePreference) -> AppResult<bool> {
        let mut inner = self.inner.write().await;
        Ok(inner
            .user_genres
            .insert((preference.user_id.clone(), preference.genre.clone())))
    }

    async fn remove_user_genre(&self, user_id: &str, genre: &str) -> AppResult<bool> {
        let mut inner = self.inner.write().await;
        Ok(inner
            .user_genres
            .remove(&(user_id.to_string(), genre.to_string())))
    }

    async fn get_user_rating(
        &self,
        user_id: &str,
        movie_id: &str,
    ) -> AppResult<Option<UserRating>> {
        let inner = self.inner.read().await;
        Ok(inner
            .ratings
            .get(&(movie_id.to_string(), user_id.to_string()))
            .cloned())
    }

    async fn upsert_user_rating(&self, rating: &UserRating) -> AppResult<Upserted> {
        let mut inner = self.inner.write().await;
        let key = (rating.movie_id.clone(), rating.user_id.clone());

        match inner.ratings.get_mut(&key) {
            Some(existing) => {
                let created_at = existing.created_at;
                *existing = rating.clone();
                existing.created_at = created_at;
                Ok(Upserted::Updated)
            }
            None => {
                inner.ratings.insert(key, rating.clone());
                Ok(Upserted::Created)
            }
        }
    }

    async fn list_ratings_for_movie(&self, movie_id: &str) -> AppResult<Vec<UserRating>> {
        let inner = self.inner.read().await;
        Ok(inner
            .ratings
            .range((movie_id.to_string(), String::new())..)
            .take_while(|((mid, _), _)| mid == movie_id)
            .map(|(_, rating)| rating.clone())
            .collect())
    }

    async fn list_user_ratings(&self, user_id: &str) -> AppResult<Vec<UserRating>> {
        let inner = self.inner.read().await;
        Ok(inner
            .ratings
            .values()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn list_all_ratings(&self) -> AppResult<Vec<UserRating>> {
        let inner = self.inner.read().await;
        Ok(inner.ratings.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_upsert_rating_reports_created_then_updated() {
        let repo = MemoryRepository::new();
        let first = UserRating::new("user001", "movie001", 6);

        assert_eq!(repo.upsert_user_rating(&first).await.unwrap(), Upserted::Created);

        let mut second = UserRating::new("user001", "movie001", 9);
        second.created_at = first.created_at + chrono::Duration::hours(1);
        assert_eq!(repo.upsert_user_rating(&second).await.unwrap(), Upserted::Updated);

        let stored = repo.get_user_rating("user001", "movie001").await.unwrap().unwrap();
        assert_eq!(stored.rating, 9);
        assert_eq!(stored.created_at, first.created_at);
        assert_eq!(repo.list_all_ratings().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_ratings_filtered_by_movie_and_user() {
        let repo = MemoryRepository::new();
        for (user, movie, score) in [
            ("user001", "movie001", 9),
            ("user002", "movie001", 8),
            ("user001", "movie002", 10),
        ] {
            repo.upsert_user_rating(&UserRating::new(user, movie, score))
                .await
                .unwrap();
        }

        let for_movie = repo.list_ratings_for_movie("movie001").await.unwrap();
        assert_eq!(for_movie.len(), 2);
        assert!(for_movie.iter().all(|r| r.movie_id == "movie001"));

        let for_user = repo.list_user_ratings("user001").await.unwrap();
        assert_eq!(for_user.len(), 2);
        assert!(for_user.iter().all(|r| r.user_id == "user001"));
    }

    #[tokio::test]
    async fn test_user_genres_add_and_remove() {
        let repo = MemoryRepository::new();
        let pref = UserGenrePreference::new("user001", "Action");

        assert!(repo.add_user_genre(&pref).await.unwrap());
        assert!(!repo.add_user_genre(&pref).await.unwrap());
        repo.add_user_genre(&UserGenrePreference::new("user002", "Drama"))
            .await
            .unwrap();

        assert_eq!(repo.list_user_genres("user001").await.unwrap(), vec![pref]);
        assert_eq!(repo.list_all_user_genres().await.unwrap().len(), 2);

        assert!(repo.remove_user_genre("user001", "Action").await.unwrap());
        assert!(!repo.remove_user_genre("user001", "Action").await.unwrap());
        assert!(repo.list_user_genres("user001").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_movies_listed_in_id_order() {
        let repo = MemoryRepository::new();
        repo.upsert_movie(&Movie::new("movie002", "The Dark Knight", &["Action"], 8.7))
            .await
            .unwrap();
        repo.upsert_movie(&Movie::new("movie001", "Inception", &["SciFi"], 8.5))
            .await
            .unwrap();

        let ids: Vec<String> = repo
            .list_movies()
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.movie_id)
            .collect();
        assert_eq!(ids, vec!["movie001", "movie002"]);
        assert!(repo.get_movie("movie999").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_ratings_for_movie_stop_at_neighbouring_ids() {
        let repo = MemoryRepository::new();
        for (user, movie) in [
            ("user001", "movie00"),
            ("user002", "movie001"),
            ("user001", "movie001"),
            ("user003", "movie0010"),
            ("user001", "movie002"),
        ] {
            repo.upsert_user_rating(&UserRating::new(user, movie, 7))
                .await
                .unwrap();
        }

        let users: Vec<String> = repo
            .list_ratings_for_movie("movie001")
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.user_id)
            .collect();
        assert_eq!(users, vec!["user001", "user002"]);
    }

    #[tokio::test]
    async fn test_find_and_top_rated_movies() {
        let repo = MemoryRepository::new();
        for movie in [
            Movie::new("movie001", "Inception", &["Action", "SciFi"], 8.5),
            Movie::new("movie002", "The Dark Knight", &["Action", "Crime"], 8.9),
            Movie::new("movie003", "Goodfellas", &["Crime", "Drama"], 8.5),
        ] {
            repo.upsert_movie(&movie).await.unwrap();
        }

        let filter = MovieFilter {
            genres: vec!["Crime".to_string()],
            min_rating: Some(8.6),
            query: None,
        };
        let found = repo.find_movies(&filter).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].movie_id, "movie002");

        let ids: Vec<String> = repo
            .top_rated_movies(2)
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.movie_id)
            .collect();
        assert_eq!(ids, vec!["movie002", "movie001"]);
    }
}
