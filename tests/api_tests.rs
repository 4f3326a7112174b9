use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use serde_json::{json, Value};
use std::sync::Arc;

use journo_api::db::MemoryRepository;
use journo_api::routes::{create_router, AppState};

fn create_test_server() -> TestServer {
    let state = AppState::new(Arc::new(MemoryRepository::new()), None, 60);
    let app = create_router(Arc::new(state));
    TestServer::new(app).unwrap()
}

async fn create_seeded_server() -> TestServer {
    let server = create_test_server();
    server.post("/api/v1/seed").await.assert_status_ok();
    server
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server();
    let response = server.get("/health").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_request_id_echoed() {
    let server = create_test_server();

    let response = server
        .get("/health")
        .add_header(
            HeaderName::from_static("x-request-id"),
            HeaderValue::from_static("trace-42"),
        )
        .await;
    assert_eq!(response.header("x-request-id"), "trace-42");

    let response = server.get("/health").await;
    let generated = response.header("x-request-id");
    assert_eq!(generated.to_str().unwrap().len(), 36);
}

#[tokio::test]
async fn test_seed_reports_counts() {
    let server = create_test_server();

    let response = server.post("/api/v1/seed").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["stats"]["movies"], 10);
    assert_eq!(body["stats"]["ratings"], 15);
    assert_eq!(body["stats"]["user_genres"], 15);
}

#[tokio::test]
async fn test_get_movie_and_not_found() {
    let server = create_seeded_server().await;

    let response = server.get("/api/v1/movies/movie006").await;
    response.assert_status_ok();
    let movie: Value = response.json();
    assert_eq!(movie["name"], "The Matrix");
    assert_eq!(movie["genres"], json!(["Action", "SciFi"]));

    let response = server.get("/api/v1/movies/movie999").await;
    response.assert_status(StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("movie999"));
}

#[tokio::test]
async fn test_journo_scores_sorted_descending() {
    let server = create_seeded_server().await;

    let response = server.get("/api/v1/journo-scores").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["count"], 10);

    let data = body["data"].as_array().unwrap();
    assert_eq!(data[0]["movie_id"], "movie002");
    assert_eq!(data[0]["new_rating"], 9.25);
    assert_eq!(data[9]["movie_id"], "movie004");
    assert_eq!(data[9]["new_rating"], 6.67);

    let scores: Vec<f64> = data
        .iter()
        .map(|m| m["new_rating"].as_f64().unwrap())
        .collect();
    assert!(scores.windows(2).all(|w| w[0] >= w[1]));
}

#[tokio::test]
async fn test_single_journo_score() {
    let server = create_seeded_server().await;

    let response = server.get("/api/v1/journo-scores/movie001").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["new_rating"], 8.75);
    assert_eq!(body["journo_rating"], 8.5);
    assert_eq!(body["rating_analytics"]["total_relevant_ratings"], 2);

    server
        .get("/api/v1/journo-scores/movie999")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_rating_validation() {
    let server = create_seeded_server().await;

    for rating in [0, 11] {
        let response = server
            .post("/api/v1/user-ratings")
            .json(&json!({
                "user_id": "user001",
                "movie_id": "movie006",
                "rating": rating
            }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert!(body["error"]
            .as_str()
            .unwrap()
            .contains("Rating must be between 1-10"));
    }
}

#[tokio::test]
async fn test_rating_create_then_update() {
    let server = create_seeded_server().await;

    let response = server
        .post("/api/v1/user-ratings")
        .json(&json!({
            "user_id": "user001",
            "movie_id": "movie006",
            "rating": 6
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["message"], "Rating saved successfully");
    assert_eq!(body["rating"]["review"], "Rated 6/10 stars");

    let response = server
        .post("/api/v1/user-ratings")
        .json(&json!({
            "user_id": "user001",
            "movie_id": "movie006",
            "rating": 10,
            "review": "Better on a rewatch",
            "emotion": "excited"
        }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["message"], "Rating updated successfully");

    let ratings: Vec<Value> = server.get("/api/v1/users/user001/ratings").await.json();
    let matrix: Vec<&Value> = ratings
        .iter()
        .filter(|r| r["movie_id"] == "movie006")
        .collect();
    assert_eq!(matrix.len(), 1);
    assert_eq!(matrix[0]["rating"], 10);
    assert_eq!(matrix[0]["review"], "Better on a rewatch");
}

#[tokio::test]
async fn test_new_rating_changes_score() {
    let server = create_seeded_server().await;

    // The Matrix: only user003 (weight 0.5) has rated it, with an 8
    let before: Value = server.get("/api/v1/journo-scores/movie006").await.json();
    assert_eq!(before["new_rating"], 8.0);

    // user001 likes both Action and SciFi, so counts with weight 1.0
    server
        .post("/api/v1/user-ratings")
        .json(&json!({
            "user_id": "user001",
            "movie_id": "movie006",
            "rating": 5
        }))
        .await
        .assert_status(StatusCode::CREATED);

    // (8 * 0.5 + 5 * 1.0) / 1.5 = 6.0
    let after: Value = server.get("/api/v1/journo-scores/movie006").await.json();
    assert_eq!(after["new_rating"], 6.0);
}

#[tokio::test]
async fn test_rating_unknown_movie() {
    let server = create_seeded_server().await;

    let response = server
        .post("/api/v1/user-ratings")
        .json(&json!({
            "user_id": "user001",
            "movie_id": "movie999",
            "rating": 7
        }))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_genre_preferences_flow() {
    let server = create_seeded_server().await;

    let response = server
        .post("/api/v1/users/user005/genres")
        .json(&json!({ "genre": "Action" }))
        .await;
    response.assert_status(StatusCode::CREATED);

    // Adding the same genre again is a no-op
    server
        .post("/api/v1/users/user005/genres")
        .json(&json!({ "genre": "Action" }))
        .await
        .assert_status_ok();

    let genres: Vec<Value> = server.get("/api/v1/users/user005/genres").await.json();
    assert_eq!(genres.len(), 4);

    server
        .post("/api/v1/users/user005/genres")
        .json(&json!({ "genre": "Western" }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    server
        .delete("/api/v1/users/user005/genres/Action")
        .await
        .assert_status(StatusCode::NO_CONTENT);
    server
        .delete("/api/v1/users/user005/genres/Action")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_preference_change_changes_score() {
    let server = create_seeded_server().await;

    // Pulp Fiction: user001 rated it 8 but likes neither Crime nor Drama
    let before: Value = server.get("/api/v1/journo-scores/movie003").await.json();
    assert_eq!(before["new_rating"], 9.0);

    server
        .post("/api/v1/users/user001/genres")
        .json(&json!({ "genre": "Crime" }))
        .await
        .assert_status(StatusCode::CREATED);

    // user001 now weighs 0.5, user004 weighs 1.0: (8 * 0.5 + 9) / 1.5 = 8.67
    let after: Value = server.get("/api/v1/journo-scores/movie003").await.json();
    assert_eq!(after["new_rating"], 8.67);
    assert_eq!(after["rating_analytics"]["total_relevant_ratings"], 2);
}

#[tokio::test]
async fn test_catalog_listings() {
    let server = create_seeded_server().await;

    let genres: Vec<Value> = server.get("/api/v1/genres").await.json();
    assert_eq!(genres.len(), 10);

    let users: Vec<Value> = server.get("/api/v1/users").await.json();
    assert_eq!(users.len(), 5);

    let movies: Vec<Value> = server.get("/api/v1/movies").await.json();
    assert_eq!(movies.len(), 10);
    assert_eq!(movies[0]["movie_id"], "movie001");
}

#[tokio::test]
async fn test_empty_store_scoreboard() {
    let server = create_test_server();

    let body: Value = server.get("/api/v1/journo-scores").await.json();
    assert_eq!(body["count"], 0);
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn test_malformed_rating_bodies_get_json_400() {
    let server = create_seeded_server().await;

    for body in [
        json!({ "movie_id": "movie006", "rating": 7 }),
        json!({ "user_id": "user001", "rating": 7 }),
        json!({ "user_id": "user001", "movie_id": "movie006", "rating": 7.5 }),
        json!({ "user_id": "user001", "movie_id": "movie006", "rating": "7" }),
        json!({ "user_id": "user001", "movie_id": "movie006" }),
    ] {
        let response = server.post("/api/v1/user-ratings").json(&body).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let error: Value = response.json();
        assert_eq!(
            error["error"],
            "Invalid rating data. Rating must be between 1-10."
        );
    }

    let ratings: Vec<Value> = server.get("/api/v1/users/user001/ratings").await.json();
    assert_eq!(ratings.len(), 3);
}

#[tokio::test]
async fn test_movie_filters() {
    let server = create_seeded_server().await;

    let crime: Vec<Value> = server
        .get("/api/v1/movies")
        .add_query_param("genre", "Crime")
        .await
        .json();
    let ids: Vec<&str> = crime.iter().map(|m| m["movie_id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["movie002", "movie003", "movie008"]);

    let strong_crime: Vec<Value> = server
        .get("/api/v1/movies")
        .add_query_param("genre", "Crime")
        .add_query_param("min_rating", 8.6)
        .await
        .json();
    assert_eq!(strong_crime.len(), 2);

    let rated: Vec<Value> = server
        .get("/api/v1/movies")
        .add_query_param("min_rating", 8.5)
        .await
        .json();
    assert_eq!(rated.len(), 5);

    let search: Vec<Value> = server
        .get("/api/v1/movies")
        .add_query_param("q", "MATRIX")
        .await
        .json();
    assert_eq!(search.len(), 1);
    assert_eq!(search[0]["name"], "The Matrix");

    server
        .get("/api/v1/movies")
        .add_query_param("min_rating", "high")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_top_rated_movies() {
    let server = create_seeded_server().await;

    let top: Vec<Value> = server
        .get("/api/v1/movies/top")
        .add_query_param("limit", 5)
        .await
        .json();
    let ids: Vec<&str> = top.iter().map(|m| m["movie_id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["movie002", "movie003", "movie007", "movie001", "movie008"]);

    let default: Vec<Value> = server.get("/api/v1/movies/top").await.json();
    assert_eq!(default.len(), 10);

    let response = server
        .get("/api/v1/movies/top")
        .add_query_param("limit", 0)
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("limit"));
}

#[tokio::test]
async fn test_recommended_movies_follow_preferences() {
    let server = create_seeded_server().await;

    // user001 likes Action, SciFi and Thriller
    let movies: Vec<Value> = server
        .get("/api/v1/users/user001/recommended-movies")
        .await
        .json();
    let ids: Vec<&str> = movies.iter().map(|m| m["movie_id"].as_str().unwrap()).collect();
    assert_eq!(
        ids,
        vec!["movie001", "movie002", "movie004", "movie005", "movie006", "movie009"]
    );

    let none: Vec<Value> = server
        .get("/api/v1/users/user999/recommended-movies")
        .await
        .json();
    assert!(none.is_empty());
}

#[tokio::test]
async fn test_single_rating_lookup() {
    let server = create_seeded_server().await;

    let response = server.get("/api/v1/users/user004/ratings/movie003").await;
    response.assert_status_ok();
    let rating: Value = response.json();
    assert_eq!(rating["rating"], 9);
    assert_eq!(rating["emotion"], "happy");

    server
        .get("/api/v1/users/user004/ratings/movie001")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_graph_data() {
    let server = create_seeded_server().await;

    let response = server.get("/api/v1/graph-data").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(
        body["data"]["stats"],
        json!({ "movies": 10, "users": 5, "genres": 10, "ratings": 15 })
    );

    let nodes = body["data"]["nodes"].as_array().unwrap();
    let emotions = nodes.iter().filter(|n| n["type"] == "emotion").count();
    assert_eq!(emotions, 5);

    let edges = body["data"]["edges"].as_array().unwrap();
    let preferences = edges.iter().filter(|e| e["type"] == "preference").count();
    assert_eq!(preferences, 15);
}

#[tokio::test]
async fn test_remove_preference_with_padded_genre() {
    let server = create_seeded_server().await;

    server
        .post("/api/v1/users/user005/genres")
        .json(&json!({ "genre": " Crime " }))
        .await
        .assert_status(StatusCode::CREATED);

    server
        .delete("/api/v1/users/user005/genres/%20Crime%20")
        .await
        .assert_status(StatusCode::NO_CONTENT);
}
