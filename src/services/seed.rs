//! Sample dataset for local development and demos.

use chrono::{DateTime, NaiveDate, Utc};

use crate::{
    db::{Cache, CacheKey, JournoRepository},
    error::AppResult,
    models::{Genre, Movie, SeedStats, User, UserGenrePreference, UserRating},
    services::invalidate_scores,
};

struct MovieRow {
    id: &'static str,
    name: &'static str,
    genres: &'static [&'static str],
    year: i32,
    director: &'static str,
    revenue: i64,
    budget: i64,
    voters_count: i64,
    voters_avg: f64,
    journo_rating: f64,
    normalized_rating: f64,
}

const GENRES: &[(&str, &str)] = &[
    ("Drama", "Dramatic films"),
    ("Crime", "Crime and detective films"),
    ("Action", "Action and adventure films"),
    ("Adventure", "Adventure and exploration films"),
    ("Comedy", "Comedy and humor films"),
    ("Romance", "Romantic films"),
    ("SciFi", "Science fiction films"),
    ("Thriller", "Thriller and suspense films"),
    ("Documentary", "Documentary films"),
    ("Animation", "Animated films"),
];

#[rustfmt::skip]
const MOVIES: &[MovieRow] = &[
    MovieRow { id: "movie001", name: "Inception", genres: &["Action", "SciFi", "Thriller"], year: 2010, director: "Christopher Nolan", revenue: 836_836_967, budget: 160_000_000, voters_count: 2_500_000, voters_avg: 8.8, journo_rating: 8.5, normalized_rating: 8.2 },
    MovieRow { id: "movie002", name: "The Dark Knight", genres: &["Action", "Crime", "Drama"], year: 2008, director: "Christopher Nolan", revenue: 1_004_558_444, budget: 185_000_000, voters_count: 2_800_000, voters_avg: 9.0, journo_rating: 8.9, normalized_rating: 8.7 },
    MovieRow { id: "movie003", name: "Pulp Fiction", genres: &["Crime", "Drama"], year: 1994, director: "Quentin Tarantino", revenue: 213_928_762, budget: 8_000_000, voters_count: 2_100_000, voters_avg: 8.9, journo_rating: 8.7, normalized_rating: 8.5 },
    MovieRow { id: "movie004", name: "Avatar", genres: &["Action", "Adventure", "SciFi"], year: 2009, director: "James Cameron", revenue: 2_847_246_203, budget: 237_000_000, voters_count: 1_200_000, voters_avg: 7.5, journo_rating: 7.2, normalized_rating: 7.0 },
    MovieRow { id: "movie005", name: "Interstellar", genres: &["Adventure", "Drama", "SciFi"], year: 2014, director: "Christopher Nolan", revenue: 677_463_813, budget: 165_000_000, voters_count: 1_800_000, voters_avg: 8.6, journo_rating: 8.3, normalized_rating: 8.1 },
    MovieRow { id: "movie006", name: "The Matrix", genres: &["Action", "SciFi"], year: 1999, director: "Lana Wachowski", revenue: 463_517_383, budget: 63_000_000, voters_count: 1_900_000, voters_avg: 8.7, journo_rating: 8.4, normalized_rating: 8.2 },
    MovieRow { id: "movie007", name: "Forrest Gump", genres: &["Drama", "Romance"], year: 1994, director: "Robert Zemeckis", revenue: 677_945_399, budget: 55_000_000, voters_count: 2_200_000, voters_avg: 8.8, journo_rating: 8.6, normalized_rating: 8.4 },
    MovieRow { id: "movie008", name: "Goodfellas", genres: &["Crime", "Drama"], year: 1990, director: "Martin Scorsese", revenue: 46_836_394, budget: 25_000_000, voters_count: 1_100_000, voters_avg: 8.7, journo_rating: 8.5, normalized_rating: 8.3 },
    MovieRow { id: "movie009", name: "Gladiator", genres: &["Action", "Adventure", "Drama"], year: 2000, director: "Ridley Scott", revenue: 460_583_960, budget: 103_000_000, voters_count: 1_500_000, voters_avg: 8.5, journo_rating: 8.2, normalized_rating: 8.0 },
    MovieRow { id: "movie010", name: "Titanic", genres: &["Drama", "Romance"], year: 1997, director: "James Cameron", revenue: 2_201_647_264, budget: 200_000_000, voters_count: 1_100_000, voters_avg: 7.9, journo_rating: 7.6, normalized_rating: 7.4 },
];

// (user_id, name, email, joined)
const USERS: &[(&str, &str, &str, (i32, u32, u32))] = &[
    ("user001", "Alex Chen", "alex@example.com", (2023, 1, 15)),
    ("user002", "Sam Johnson", "sam@example.com", (2023, 2, 20)),
    ("user003", "Jordan Smith", "jordan@example.com", (2023, 3, 10)),
    ("user004", "Casey Brown", "casey@example.com", (2023, 4, 5)),
    ("user005", "Taylor Davis", "taylor@example.com", (2023, 5, 12)),
];

// (user_id, movie_id, rating, review, emotion, rated on)
#[rustfmt::skip]
const RATINGS: &[(&str, &str, i16, &str, &str, (i32, u32, u32))] = &[
    ("user001", "movie001", 9, "Mind-bending masterpiece! The concept of dream infiltration is executed perfectly.", "excited", (2023, 6, 15)),
    ("user001", "movie002", 10, "Heath Ledger's Joker is absolutely terrifying and brilliant.", "excited", (2023, 7, 20)),
    ("user001", "movie003", 8, "Quirky and violent, but undeniably influential.", "happy", (2023, 8, 10)),
    ("user002", "movie001", 8, "Complex but rewarding. The visual effects are groundbreaking.", "calm", (2023, 6, 18)),
    ("user002", "movie004", 7, "Visually stunning but the story is a bit thin.", "neutral", (2023, 7, 25)),
    ("user002", "movie005", 9, "Emotional and scientifically accurate. The ending is perfect.", "sad", (2023, 8, 15)),
    ("user003", "movie002", 9, "Dark, complex, and perfectly executed. A true masterpiece.", "excited", (2023, 7, 22)),
    ("user003", "movie006", 8, "Revolutionary for its time. The bullet time effect changed cinema.", "excited", (2023, 8, 5)),
    ("user003", "movie007", 7, "Heartwarming story with great performances.", "happy", (2023, 9, 1)),
    ("user004", "movie003", 9, "Tarantino at his best. The dialogue is razor-sharp.", "happy", (2023, 8, 12)),
    ("user004", "movie008", 8, "Gritty and realistic portrayal of mob life.", "calm", (2023, 9, 10)),
    ("user004", "movie009", 7, "Epic scale with great action sequences.", "excited", (2023, 10, 5)),
    ("user005", "movie004", 6, "Beautiful visuals but the story is predictable.", "neutral", (2023, 7, 28)),
    ("user005", "movie005", 8, "Complex and emotional. The science is well-researched.", "sad", (2023, 8, 20)),
    ("user005", "movie010", 7, "Classic love story with great production value.", "sad", (2023, 9, 15)),
];

const USER_GENRES: &[(&str, &str)] = &[
    ("user001", "Action"),
    ("user001", "SciFi"),
    ("user001", "Thriller"),
    ("user002", "Drama"),
    ("user002", "Adventure"),
    ("user002", "SciFi"),
    ("user003", "Action"),
    ("user003", "Crime"),
    ("user003", "Drama"),
    ("user004", "Crime"),
    ("user004", "Drama"),
    ("user004", "Action"),
    ("user005", "Drama"),
    ("user005", "Romance"),
    ("user005", "SciFi"),
];

fn date((year, month, day): (i32, u32, u32)) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .unwrap_or_default()
}

pub fn sample_genres() -> Vec<Genre> {
    GENRES
        .iter()
        .map(|(name, description)| Genre {
            name: name.to_string(),
            description: Some(description.to_string()),
        })
        .collect()
}

pub fn sample_movies() -> Vec<Movie> {
    MOVIES
        .iter()
        .map(|row| Movie {
            year: Some(row.year),
            director: Some(row.director.to_string()),
            revenue: Some(row.revenue),
            budget: Some(row.budget),
            voters_count: Some(row.voters_count),
            voters_avg: Some(row.voters_avg),
            normalized_rating: Some(row.normalized_rating),
            ..Movie::new(row.id, row.name, row.genres, row.journo_rating)
        })
        .collect()
}

pub fn sample_users() -> Vec<User> {
    USERS
        .iter()
        .map(|&(user_id, name, email, joined)| User {
            user_id: user_id.to_string(),
            name: name.to_string(),
            email: Some(email.to_string()),
            join_date: date(joined),
        })
        .collect()
}

pub fn sample_ratings() -> Vec<UserRating> {
    RATINGS
        .iter()
        .map(|&(user_id, movie_id, rating, review, emotion, rated_on)| UserRating {
            review: review.to_string(),
            emotion: Some(emotion.to_string()),
            verified: true,
            created_at: date(rated_on),
            updated_at: date(rated_on),
            ..UserRating::new(user_id, movie_id, rating)
        })
        .collect()
}

pub fn sample_user_genres() -> Vec<UserGenrePreference> {
    USER_GENRES
        .iter()
        .map(|(user_id, genre)| UserGenrePreference::new(user_id, genre))
        .collect()
}

/// Writes the sample dataset. Safe to run repeatedly.
pub async fn seed_database(
    repo: &dyn JournoRepository,
    cache: Option<&Cache>,
) -> AppResult<SeedStats> {
    tracing::info!("Starting database seeding");

    let genres = sample_genres();
    for genre in &genres {
        repo.upsert_genre(genre).await?;
    }

    let movies = sample_movies();
    for movie in &movies {
        repo.upsert_movie(movie).await?;
    }

    let users = sample_users();
    for user in &users {
        repo.upsert_user(user).await?;
    }

    let ratings = sample_ratings();
    for rating in &ratings {
        repo.upsert_user_rating(rating).await?;
    }

    let user_genres = sample_user_genres();
    for preference in &user_genres {
        repo.add_user_genre(preference).await?;
    }

    let mut stale = vec![CacheKey::JournoScores];
    stale.extend(movies.iter().map(|m| CacheKey::MovieScore(m.movie_id.clone())));
    invalidate_scores(cache, &stale).await;

    let stats = SeedStats {
        genres: genres.len(),
        movies: movies.len(),
        users: users.len(),
        ratings: ratings.len(),
        user_genres: user_genres.len(),
    };

    tracing::info!(?stats, "Database seeding completed");

    Ok(stats)
}
