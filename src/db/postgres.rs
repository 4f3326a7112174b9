use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};

use super::repository::{JournoRepository, Upserted};
use crate::{
    error::AppResult,
    models::{Genre, Movie, MovieFilter, User, UserGenrePreference, UserRating},
};

const MOVIE_COLUMNS: &str = "movie_id, name, description, genres, year, director, poster, \
     revenue, budget, voters_count, voters_avg, journo_rating, normalized_rating";

const RATING_COLUMNS: &str =
    "user_id, movie_id, rating, review, emotion, verified, created_at, updated_at";

/// Wraps `query` for `ILIKE`, escaping its wildcards
fn like_pattern(query: &str) -> String {
    let escaped = query
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

/// Creates a PostgreSQL connection pool
///
/// Establishes a pool of database connections for efficient reuse.
/// The pool automatically manages connection lifecycle and limits.
pub async fn create_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    Ok(pool)
}

/// Applies the schema migrations bundled with the crate
pub async fn run_migrations(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    tracing::info!("Database migrations applied");
    Ok(())
}

/// Repository backed by PostgreSQL
#[derive(Clone)]
pub struct PgRepository {
    pool: PgPool,
}

impl PgRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JournoRepository for PgRepository {
    async fn list_movies(&self) -> AppResult<Vec<Movie>> {
        let sql = format!("SELECT {} FROM movies ORDER BY movie_id", MOVIE_COLUMNS);
        let movies = sqlx::query_as::<_, Movie>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(movies)
    }

    async fn get_movie(&self, movie_id: &str) -> AppResult<Option<Movie>> {
        let sql = format!("SELECT {} FROM movies WHERE movie_id = $1", MOVIE_COLUMNS);
        let movie = sqlx::query_as::<_, Movie>(&sql)
            .bind(movie_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(movie)
    }

    async fn upsert_movie(&self, movie: &Movie) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO movies (movie_id, name, description, genres, year, director, poster,
                 revenue, budget, voters_count, voters_avg, journo_rating, normalized_rating)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
             ON CONFLICT (movie_id) DO UPDATE SET
                 name = EXCLUDED.name,
                 description = EXCLUDED.description,
                 genres = EXCLUDED.genres,
                 year = EXCLUDED.year,
                 director = EXCLUDED.director,
                 poster = EXCLUDED.poster,
                 revenue = EXCLUDED.revenue,
                 budget = EXCLUDED.budget,
                 voters_count = EXCLUDED.voters_count,
                 voters_avg = EXCLUDED.voters_avg,
                 journo_rating = EXCLUDED.journo_rating,
                 normalized_rating = EXCLUDED.normalized_rating",
        )
        .bind(&movie.movie_id)
        .bind(&movie.name)
        .bind(&movie.description)
        .bind(&movie.genres)
        .bind(movie.year)
        .bind(&movie.director)
        .bind(&movie.poster)
        .bind(movie.revenue)
        .bind(movie.budget)
        .bind(movie.voters_count)
        .bind(movie.voters_avg)
        .bind(movie.journo_rating)
        .bind(movie.normalized_rating)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_movies(&self, filter: &MovieFilter) -> AppResult<Vec<Movie>> {
        let sql = format!(
            "SELECT {} FROM movies
             WHERE (cardinality($1::text[]) = 0 OR genres && $1::text[])
               AND ($2::float8 IS NULL OR journo_rating >= $2)
               AND ($3::text IS NULL OR name ILIKE $3 OR description ILIKE $3)
             ORDER BY movie_id",
            MOVIE_COLUMNS
        );
        let movies = sqlx::query_as::<_, Movie>(&sql)
            .bind(&filter.genres)
            .bind(filter.min_rating)
            .bind(filter.query.as_deref().map(like_pattern))
            .fetch_all(&self.pool)
            .await?;
        Ok(movies)
    }

    async fn top_rated_movies(&self, limit: usize) -> AppResult<Vec<Movie>> {
        let sql = format!(
            "SELECT {} FROM movies ORDER BY journo_rating DESC, movie_id LIMIT $1",
            MOVIE_COLUMNS
        );
        let movies = sqlx::query_as::<_, Movie>(&sql)
            .bind(i64::try_from(limit).unwrap_or(i64::MAX))
            .fetch_all(&self.pool)
            .await?;
        Ok(movies)
    }

    async fn list_genres(&self) -> AppResult<Vec<Genre>> {
        let genres = sqlx::query_as::<_, Genre>("SELECT name, description FROM genres ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(genres)
    }

    async fn get_genre(&self, name: &str) -> AppResult<Option<Genre>> {
        let genre =
            sqlx::query_as::<_, Genre>("SELECT name, description FROM genres WHERE name = $1")
                .bind(name)
                .fetch_optional(&self.pool)
                .await?;
        Ok(genre)
    }

    async fn upsert_genre(&self, genre: &Genre) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO genres (name, description) VALUES ($1, $2)
             ON CONFLICT (name) DO UPDATE SET description = EXCLUDED.description",
        )
        .bind(&genre.name)
        .bind(&genre.description)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list_users(&self) -> AppResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            "SELECT user_id, name, email, join_date FROM users ORDER BY user_id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    async fn upsert_user(&self, user: &User) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO users (user_id, name, email, join_date) VALUES ($1, $2, $3, $4)
             ON CONFLICT (user_id) DO UPDATE SET
                 name = EXCLUDED.name,
                 email = EXCLUDED.email,
                 join_date = EXCLUDED.join_date",
        )
        .bind(&user.user_id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(user.join_date)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list_all_user_genres(&self) -> AppResult<Vec<UserGenrePreference>> {
        let preferences = sqlx::query_as::<_, UserGenrePreference>(
            "SELECT user_id, genre FROM user_genres ORDER BY user_id, genre",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(preferences)
    }

    async fn list_user_genres(&self, user_id: &str) -> AppResult<Vec<UserGenrePreference>> {
        let preferences = sqlx::query_as::<_, UserGenrePreference>(
            "SELECT user_id, genre FROM user_genres WHERE user_id = $1 ORDER BY genre",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(preferences)
    }

    async fn add_user_genre(&self, preference: &UserGenrePreference) -> AppResult<bool> {
        let result = sqlx::query(
            "INSERT INTO user_genres (user_id, genre) VALUES ($1, $2)
             ON CONFLICT (user_id, genre) DO NOTHING",
        )
        .bind(&preference.user_id)
        .bind(&preference.genre)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn remove_user_genre(&self, user_id: &str, genre: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM user_genres WHERE user_id = $1 AND genre = $2")
            .bind(user_id)
            .bind(genre)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn get_user_rating(
        &self,
        user_id: &str,
        movie_id: &str,
    ) -> AppResult<Option<UserRating>> {
        let sql = format!(
            "SELECT {} FROM user_ratings WHERE user_id = $1 AND movie_id = $2",
            RATING_COLUMNS
        );
        let rating = sqlx::query_as::<_, UserRating>(&sql)
            .bind(user_id)
            .bind(movie_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(rating)
    }

    async fn upsert_user_rating(&self, rating: &UserRating) -> AppResult<Upserted> {
        // xmax is zero only for freshly inserted tuples
        let inserted: bool = sqlx::query_scalar(
            "INSERT INTO user_ratings
                 (user_id, movie_id, rating, review, emotion, verified, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             ON CONFLICT (user_id, movie_id) DO UPDATE SET
                 rating = EXCLUDED.rating,
                 review = EXCLUDED.review,
                 emotion = EXCLUDED.emotion,
                 verified = EXCLUDED.verified,
                 updated_at = EXCLUDED.updated_at
             RETURNING (xmax = 0)",
        )
        .bind(&rating.user_id)
        .bind(&rating.movie_id)
        .bind(rating.rating)
        .bind(&rating.review)
        .bind(&rating.emotion)
        .bind(rating.verified)
        .bind(rating.created_at)
        .bind(rating.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(if inserted {
            Upserted::Created
        } else {
            Upserted::Updated
        })
    }

    async fn list_ratings_for_movie(&self, movie_id: &str) -> AppResult<Vec<UserRating>> {
        let sql = format!(
            "SELECT {} FROM user_ratings WHERE movie_id = $1 ORDER BY user_id",
            RATING_COLUMNS
        );
        let ratings = sqlx::query_as::<_, UserRating>(&sql)
            .bind(movie_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(ratings)
    }

    async fn list_user_ratings(&self, user_id: &str) -> AppResult<Vec<UserRating>> {
        let sql = format!(
            "SELECT {} FROM user_ratings WHERE user_id = $1 ORDER BY movie_id",
            RATING_COLUMNS
        );
        let ratings = sqlx::query_as::<_, UserRating>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(ratings)
    }

    async fn list_all_ratings(&self) -> AppResult<Vec<UserRating>> {
        let sql = format!(
            "SELECT {} FROM user_ratings ORDER BY movie_id, user_id",
            RATING_COLUMNS
        );
        let ratings = sqlx::query_as::<_, UserRating>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(ratings)
    }
}
