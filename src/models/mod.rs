use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lowest score a user may give a movie
pub const MIN_RATING: i16 = 1;
/// Highest score a user may give a movie
pub const MAX_RATING: i16 = 10;

/// A movie together with its genre set and baseline journo rating
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
pub struct Movie {
    pub movie_id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub genres: Vec<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub director: Option<String>,
    #[serde(default)]
    pub poster: Option<String>,
    #[serde(default)]
    pub revenue: Option<i64>,
    #[serde(default)]
    pub budget: Option<i64>,
    #[serde(default)]
    pub voters_count: Option<i64>,
    #[serde(default)]
    pub voters_avg: Option<f64>,
    /// Baseline rating, returned unchanged when no genre-aligned ratings exist
    pub journo_rating: f64,
    #[serde(default)]
    pub normalized_rating: Option<f64>,
}

impl Movie {
    /// Creates a movie with only the fields the scorer needs
    pub fn new(movie_id: &str, name: &str, genres: &[&str], journo_rating: f64) -> Self {
        Self {
            movie_id: movie_id.to_string(),
            name: name.to_string(),
            description: None,
            genres: genres.iter().map(|g| g.to_string()).collect(),
            year: None,
            director: None,
            poster: None,
            revenue: None,
            budget: None,
            voters_count: None,
            voters_avg: None,
            journo_rating,
            normalized_rating: None,
        }
    }
}

/// Entry in the genre catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, sqlx::FromRow)]
pub struct Genre {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
pub struct User {
    pub user_id: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    pub join_date: DateTime<Utc>,
}

/// One liked genre for one user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, sqlx::FromRow)]
pub struct UserGenrePreference {
    pub user_id: String,
    pub genre: String,
}

impl UserGenrePreference {
    pub fn new(user_id: &str, genre: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            genre: genre.to_string(),
        }
    }
}

/// A user's score for a movie. At most one exists per (user, movie).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
pub struct UserRating {
    pub user_id: String,
    pub movie_id: String,
    pub rating: i16,
    pub review: String,
    #[serde(default)]
    pub emotion: Option<String>,
    #[serde(default)]
    pub verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserRating {
    pub fn new(user_id: &str, movie_id: &str, rating: i16) -> Self {
        let now = Utc::now();
        Self {
            user_id: user_id.to_string(),
            movie_id: movie_id.to_string(),
            rating,
            review: default_review(rating),
            emotion: None,
            verified: false,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Review text stored when the user leaves none
pub fn default_review(rating: i16) -> String {
    format!("Rated {}/10 stars", rating)
}

// ============================================================================
// Scoring Types
// ============================================================================

/// Summary of the ratings that fed a movie's journo score
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RatingAnalytics {
    pub total_relevant_ratings: usize,
    pub interested_users_count: usize,
    pub average_rating_from_interested_users: Option<f64>,
}

/// A movie with its recomputed journo score
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoredMovie {
    #[serde(flatten)]
    pub movie: Movie,
    pub new_rating: f64,
    pub rating_analytics: RatingAnalytics,
}

// ============================================================================
// Request / Response Types
// ============================================================================

/// Body of a rating submission
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitRatingRequest {
    pub user_id: String,
    pub movie_id: String,
    pub rating: i64,
    #[serde(default)]
    pub review: Option<String>,
    #[serde(default)]
    pub emotion: Option<String>,
    #[serde(default)]
    pub verified: bool,
}

/// Catalog filters. Every filter that is set must match.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MovieFilter {
    /// Movie carries at least one of these genres
    pub genres: Vec<String>,
    /// Baseline rating at or above this value
    pub min_rating: Option<f64>,
    /// Case-insensitive substring of the name or description
    pub query: Option<String>,
}

impl MovieFilter {
    pub fn matches(&self, movie: &Movie) -> bool {
        let genre_ok =
            self.genres.is_empty() || movie.genres.iter().any(|g| self.genres.contains(g));
        let rating_ok = self.min_rating.map_or(true, |min| movie.journo_rating >= min);
        let query_ok = self.query.as_deref().map_or(true, |q| {
            let q = q.to_lowercase();
            movie.name.to_lowercase().contains(&q)
                || movie
                    .description
                    .as_deref()
                    .is_some_and(|d| d.to_lowercase().contains(&q))
        });
        genre_ok && rating_ok && query_ok
    }
}

/// Body of a genre preference submission
#[derive(Debug, Clone, Deserialize)]
pub struct AddGenreRequest {
    pub genre: String,
}

/// Number of rows written per entity by a seed run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeedStats {
    pub genres: usize,
    pub movies: usize,
    pub users: usize,
    pub ratings: usize,
    pub user_genres: usize,
}

// ============================================================================
// Graph Types
// ============================================================================

/// Node of the catalog graph, tagged by `type`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GraphNode {
    User {
        id: String,
        label: String,
        join_date: DateTime<Utc>,
        total_ratings: usize,
    },
    Movie {
        id: String,
        label: String,
        year: Option<i32>,
        rating: f64,
        director: Option<String>,
        poster: Option<String>,
        genres: Vec<String>,
    },
    Genre {
        id: String,
        label: String,
        description: Option<String>,
    },
    Emotion {
        id: String,
        label: String,
    },
}

/// Edge of the catalog graph, tagged by `type`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GraphEdge {
    /// User rated movie
    Rating {
        from: String,
        to: String,
        rating: i16,
        emotion: Option<String>,
        verified: bool,
    },
    /// Movie belongs to genre
    Genre { from: String, to: String },
    /// User likes genre
    Preference { from: String, to: String },
    /// Emotion was felt about a movie of this genre, once per rating
    EmotionGenre { from: String, to: String },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct GraphStats {
    pub movies: usize,
    pub users: usize,
    pub genres: usize,
    pub ratings: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GraphData {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    pub stats: GraphStats,
}
