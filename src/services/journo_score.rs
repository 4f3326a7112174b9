//! Genre-weighted journo score.
//!
//! A movie's journo score is the weighted average of the ratings given by users
//! whose preferred genres overlap the movie's genres. Each rating is weighted by
//! the fraction of the movie's genres that the rater likes:
//!
//! ```text
//! weight(user) = |preferred(user) ∩ genres(movie)| / |genres(movie)|
//! score        = round(Σ rating·weight / Σ weight, 2)
//! ```
//!
//! When no genre-aligned user has rated the movie, the movie's baseline
//! `journo_rating` is returned unchanged. Everything here is pure: callers fetch
//! the inputs and decide what to do with the output.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::models::{Movie, RatingAnalytics, ScoredMovie, UserGenrePreference, UserRating};

/// Rounds to two decimal places, half away from zero
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Per-movie view of the inputs: the movie's genre set and, for each
/// interested user, how many of those genres they like
struct GenreOverlap<'a> {
    genre_count: usize,
    overlap_by_user: HashMap<&'a str, usize>,
}

impl<'a> GenreOverlap<'a> {
    fn new(movie: &'a Movie, preferences: &'a [UserGenrePreference]) -> Self {
        let movie_genres: HashSet<&str> = movie.genres.iter().map(String::as_str).collect();

        // Dedupe (user, genre) rows so a repeated preference is counted once
        let matching: HashSet<(&str, &str)> = preferences
            .iter()
            .filter(|p| movie_genres.contains(p.genre.as_str()))
            .map(|p| (p.user_id.as_str(), p.genre.as_str()))
            .collect();

        let mut overlap_by_user = HashMap::new();
        for (user_id, _) in matching {
            *overlap_by_user.entry(user_id).or_insert(0) += 1;
        }

        Self {
            genre_count: movie_genres.len(),
            overlap_by_user,
        }
    }

    /// Fraction of the movie's genres the user prefers, `None` for users who
    /// share no genre with the movie
    fn weight(&self, user_id: &str) -> Option<f64> {
        if self.genre_count == 0 {
            return None;
        }
        self.overlap_by_user
            .get(user_id)
            .map(|&overlap| overlap as f64 / self.genre_count as f64)
    }

    fn interested_users(&self) -> usize {
        self.overlap_by_user.len()
    }
}

/// Ratings of `movie` made by interested users, paired with their weight
fn relevant_ratings<'a>(
    movie: &'a Movie,
    overlap: &'a GenreOverlap<'a>,
    ratings: &'a [UserRating],
) -> impl Iterator<Item = (f64, f64)> + 'a {
    ratings
        .iter()
        .filter(move |r| r.movie_id == movie.movie_id)
        .filter_map(move |r| {
            overlap
                .weight(&r.user_id)
                .map(|weight| (f64::from(r.rating), weight))
        })
}

/// Computes the genre-weighted rating for a single movie.
///
/// `ratings` may contain ratings of other movies; they are ignored. A movie
/// with no genres, or with no ratings from genre-aligned users, falls back to
/// its baseline `journo_rating`.
pub fn compute_weighted_rating(
    movie: &Movie,
    preferences: &[UserGenrePreference],
    ratings: &[UserRating],
) -> f64 {
    let overlap = GenreOverlap::new(movie, preferences);

    let (weighted_sum, total_weight) = relevant_ratings(movie, &overlap, ratings)
        .fold((0.0, 0.0), |(sum, total), (rating, weight)| {
            (sum + rating * weight, total + weight)
        });

    if total_weight > 0.0 {
        round2(weighted_sum / total_weight)
    } else {
        movie.journo_rating
    }
}

/// Counts and plain average of the ratings that fed a movie's score
pub fn rating_analytics(
    movie: &Movie,
    preferences: &[UserGenrePreference],
    ratings: &[UserRating],
) -> RatingAnalytics {
    let overlap = GenreOverlap::new(movie, preferences);

    let relevant: Vec<f64> = relevant_ratings(movie, &overlap, ratings)
        .map(|(rating, _)| rating)
        .collect();

    let average = if relevant.is_empty() {
        None
    } else {
        Some(round2(relevant.iter().sum::<f64>() / relevant.len() as f64))
    };

    RatingAnalytics {
        total_relevant_ratings: relevant.len(),
        interested_users_count: overlap.interested_users(),
        average_rating_from_interested_users: average,
    }
}

/// Scores every movie and orders the result by score, highest first.
///
/// Ties are broken by movie id so the order is stable across calls.
pub fn score_movies(
    movies: Vec<Movie>,
    preferences: &[UserGenrePreference],
    ratings: &[UserRating],
) -> Vec<ScoredMovie> {
    let mut ratings_by_movie: BTreeMap<&str, Vec<UserRating>> = BTreeMap::new();
    for rating in ratings {
        ratings_by_movie
            .entry(rating.movie_id.as_str())
            .or_default()
            .push(rating.clone());
    }

    let mut scored: Vec<ScoredMovie> = movies
        .into_iter()
        .map(|movie| {
            let movie_ratings = ratings_by_movie
                .get(movie.movie_id.as_str())
                .map(Vec::as_slice)
                .unwrap_or(&[]);
            score_movie(movie, preferences, movie_ratings)
        })
        .collect();

    scored.sort_by(|a, b| {
        b.new_rating
            .total_cmp(&a.new_rating)
            .then_with(|| a.movie.movie_id.cmp(&b.movie.movie_id))
    });

    scored
}

/// Scores a single movie, bundling the score with its analytics
pub fn score_movie(
    movie: Movie,
    preferences: &[UserGenrePreference],
    ratings: &[UserRating],
) -> ScoredMovie {
    let new_rating = compute_weighted_rating(&movie, preferences, ratings);
    let rating_analytics = rating_analytics(&movie, preferences, ratings);
    ScoredMovie {
        movie,
        new_rating,
        rating_analytics,
    }
}
