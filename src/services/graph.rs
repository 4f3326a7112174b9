//! Node/edge view of the whole catalog for visualisation clients.

use std::collections::{BTreeSet, HashMap};

use crate::{
    db::JournoRepository,
    error::AppResult,
    models::{
        Genre, GraphData, GraphEdge, GraphNode, GraphStats, Movie, User, UserGenrePreference,
        UserRating,
    },
};

fn emotion_node_id(emotion: &str) -> String {
    format!("emotion_{}", emotion)
}

/// Loads every entity and links them into one graph
pub async fn catalog_graph(repo: &dyn JournoRepository) -> AppResult<GraphData> {
    let movies = repo.list_movies().await?;
    let users = repo.list_users().await?;
    let genres = repo.list_genres().await?;
    let ratings = repo.list_all_ratings().await?;
    let preferences = repo.list_all_user_genres().await?;

    let graph = build_graph(&movies, &users, &genres, &ratings, &preferences);

    tracing::info!(
        nodes = graph.nodes.len(),
        edges = graph.edges.len(),
        "Built catalog graph"
    );

    Ok(graph)
}

/// Nodes come in user, movie, genre, emotion order; edges in rating, genre,
/// preference, emotion-genre order
pub fn build_graph(
    movies: &[Movie],
    users: &[User],
    genres: &[Genre],
    ratings: &[UserRating],
    preferences: &[UserGenrePreference],
) -> GraphData {
    let mut ratings_per_user: HashMap<&str, usize> = HashMap::new();
    for rating in ratings {
        *ratings_per_user.entry(rating.user_id.as_str()).or_default() += 1;
    }

    let emotions: BTreeSet<&str> = ratings
        .iter()
        .filter_map(|r| r.emotion.as_deref())
        .filter(|e| !e.is_empty())
        .collect();

    let mut nodes = Vec::with_capacity(users.len() + movies.len() + genres.len() + emotions.len());
    nodes.extend(users.iter().map(|user| GraphNode::User {
        id: user.user_id.clone(),
        label: user.name.clone(),
        join_date: user.join_date,
        total_ratings: ratings_per_user.get(user.user_id.as_str()).copied().unwrap_or(0),
    }));
    nodes.extend(movies.iter().map(|movie| GraphNode::Movie {
        id: movie.movie_id.clone(),
        label: movie.name.clone(),
        year: movie.year,
        rating: movie.journo_rating,
        director: movie.director.clone(),
        poster: movie.poster.clone(),
        genres: movie.genres.clone(),
    }));
    nodes.extend(genres.iter().map(|genre| GraphNode::Genre {
        id: genre.name.clone(),
        label: genre.name.clone(),
        description: genre.description.clone(),
    }));
    nodes.extend(emotions.iter().map(|emotion| GraphNode::Emotion {
        id: emotion_node_id(emotion),
        label: emotion.to_string(),
    }));

    let mut edges: Vec<GraphEdge> = ratings
        .iter()
        .map(|rating| GraphEdge::Rating {
            from: rating.user_id.clone(),
            to: rating.movie_id.clone(),
            rating: rating.rating,
            emotion: rating.emotion.clone(),
            verified: rating.verified,
        })
        .collect();

    for movie in movies {
        edges.extend(movie.genres.iter().map(|genre| GraphEdge::Genre {
            from: movie.movie_id.clone(),
            to: genre.clone(),
        }));
    }

    edges.extend(preferences.iter().map(|p| GraphEdge::Preference {
        from: p.user_id.clone(),
        to: p.genre.clone(),
    }));

    let movies_by_id: HashMap<&str, &Movie> =
        movies.iter().map(|m| (m.movie_id.as_str(), m)).collect();
    for rating in ratings {
        let Some(emotion) = rating.emotion.as_deref().filter(|e| !e.is_empty()) else {
            continue;
        };
        let Some(movie) = movies_by_id.get(rating.movie_id.as_str()) else {
            continue;
        };
        edges.extend(movie.genres.iter().map(|genre| GraphEdge::EmotionGenre {
            from: emotion_node_id(emotion),
            to: genre.clone(),
        }));
    }

    GraphData {
        nodes,
        edges,
        stats: GraphStats {
            movies: movies.len(),
            users: users.len(),
            genres: genres.len(),
            ratings: ratings.len(),
        },
    }
}
