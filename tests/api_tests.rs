// tests/api_tests.rs

use std::sync::Arc;

use async_trait::async_trait;
use axum::{body::Body, http::Request};
use quizhost::{
    QuizManager,
    config::Config,
    error::AppError,
    models::quiz::Catalog,
    routes,
    state::AppState,
    store::{CatalogStore, MemoryStore},
};
use serde_json::{Value, json};
use tower::ServiceExt;

/// Helper function to spawn the app on a random port for testing.
/// Returns the base URL (e.g., "http://127.0.0.1:12345").
async fn spawn_app() -> String {
    let config = Config::ephemeral("http://quiz.test/".parse().unwrap());
    let state = AppState::new(QuizManager::new(), Arc::new(MemoryStore::new()), config);
    let app = routes::create_router(state);

    // Bind to port 0 to get a random available port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");

    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    address
}

/// Store whose saves always fail, e.g. a read-only disk.
struct ReadOnlyStore;

#[async_trait]
impl CatalogStore for ReadOnlyStore {
    async fn load(&self) -> Result<Catalog, AppError> {
        Ok(Catalog::default())
    }

    async fn save(&self, _catalog: &Catalog) -> Result<(), AppError> {
        Err(AppError::InternalServerError("read-only catalog".to_string()))
    }
}

fn geo_quiz() -> Value {
    json!({
        "name": "Geo",
        "questions": [
            {"text": "Capital of France?", "options": ["Paris", "Lyon"], "answer": "Paris"},
            {"text": "2+2?", "options": "3|4", "answer": "4"}
        ]
    })
}

async fn create_geo(client: &reqwest::Client, address: &str) -> i64 {
    let response = client
        .post(format!("{}/api/quizzes", address))
        .json(&geo_quiz())
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 201);

    let body: Value = response.json().await.unwrap();
    body["id"].as_i64().expect("id missing")
}

#[tokio::test]
async fn unknown_path_is_404() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/random_path_that_does_not_exist", address))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn non_numeric_quiz_id_is_rejected() {
    let config = Config::ephemeral("http://quiz.test/".parse().unwrap());
    let state = AppState::new(QuizManager::new(), Arc::new(MemoryStore::new()), config);
    let app = routes::create_router(state);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/quizzes/not-a-number/question")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn create_quiz_returns_join_url() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/api/quizzes", address))
        .json(&geo_quiz())
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 201);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["name"], "Geo");
    assert_eq!(body["question_count"], 2);
    assert_eq!(body["join_url"], format!("http://quiz.test/join_quiz/{}", body["id"]));

    let listing: Vec<Value> = client
        .get(format!("{}/api/quizzes", address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(listing.len(), 1);
}

#[tokio::test]
async fn create_quiz_fails_validation() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    // Act: no questions, then a question without an answer
    for payload in [
        json!({"name": "Empty", "questions": []}),
        json!({"name": "Broken", "questions": [{"text": "?", "options": ["a", "b"]}]}),
        json!({"questions": [{"text": "?", "options": ["a", "b"], "answer": "a"}]}),
    ] {
        let response = client
            .post(format!("{}/api/quizzes", address))
            .json(&payload)
            .send()
            .await
            .unwrap();

        assert_eq!(response.status().as_u16(), 400);
        let body: Value = response.json().await.unwrap();
        assert!(body["error"].is_string());
    }
}

#[tokio::test]
async fn quiz_detail_hides_answers() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let id = create_geo(&client, &address).await;

    let quiz: Value = client
        .get(format!("{}/api/quizzes/{}", address, id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(quiz["questions"][1]["options"], json!(["3", "4"]));
    assert!(quiz["questions"][0].get("answer").is_none());
}

#[tokio::test]
async fn join_unknown_quiz_is_404() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/api/quizzes/42/players", address))
        .json(&json!({"player_name": "Alice"}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 404);

    let response = client
        .get(format!("{}/api/quizzes/42/link", address))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn geo_session_flow() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let id = create_geo(&client, &address).await;

    // 1. Join
    let token: Value = client
        .post(format!("{}/api/quizzes/{}/players", address, id))
        .json(&json!({"player_name": "Alice"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(token["player"], "Alice");
    assert_eq!(token["state"], "in_progress");

    let score: Value = client
        .get(format!("{}/api/quizzes/{}/players/Alice/score", address, id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(score["score"], 0);

    // 2. Poll and answer both questions
    for (expected_text, answer, expected_score) in
        [("Capital of France?", "Paris", 1), ("2+2?", "4", 2)]
    {
        let current: Value = client
            .get(format!("{}/api/quizzes/{}/question", address, id))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(current["status"], "active");
        assert_eq!(current["question"]["text"], expected_text);

        let result: Value = client
            .post(format!("{}/api/quizzes/{}/answers", address, id))
            .json(&json!({"player_name": "Alice", "answer": answer}))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(result["correct"], true);
        assert_eq!(result["score"], expected_score);
    }

    // 3. Session is complete
    let current: Value = client
        .get(format!("{}/api/quizzes/{}/question", address, id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(current, json!({"status": "complete"}));

    let late = client
        .post(format!("{}/api/quizzes/{}/answers", address, id))
        .json(&json!({"player_name": "Alice", "answer": "4"}))
        .send()
        .await
        .unwrap();
    assert_eq!(late.status().as_u16(), 409);

    let results: Value = client
        .get(format!("{}/api/quizzes/{}/results", address, id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(results["state"], "complete");
    assert_eq!(results["players"][0]["player"], "Alice");
    assert_eq!(results["players"][0]["score"], 2);
}

#[tokio::test]
async fn unknown_player_cannot_answer() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let id = create_geo(&client, &address).await;

    client
        .post(format!("{}/api/quizzes/{}/players", address, id))
        .json(&json!({"player_name": "Alice"}))
        .send()
        .await
        .unwrap();

    let response = client
        .post(format!("{}/api/quizzes/{}/answers", address, id))
        .json(&json!({"player_name": "Mallory", "answer": "Paris"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);

    let response = client
        .get(format!("{}/api/quizzes/{}/players/Mallory/score", address, id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn concurrent_answers_advance_once_each() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let questions: Vec<Value> = (0..20)
        .map(|i| json!({"text": format!("Q{}", i), "options": ["A", "B"], "answer": "A"}))
        .collect();
    let created: Value = client
        .post(format!("{}/api/quizzes", address))
        .json(&json!({"name": "Race", "questions": questions}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let id = created["id"].as_i64().unwrap();

    client
        .post(format!("{}/api/quizzes/{}/players", address, id))
        .json(&json!({"player_name": "Alice"}))
        .send()
        .await
        .unwrap();

    let mut handles = Vec::new();
    for _ in 0..20 {
        let client = client.clone();
        let url = format!("{}/api/quizzes/{}/answers", address, id);
        handles.push(tokio::spawn(async move {
            client
                .post(url)
                .json(&json!({"player_name": "Alice", "answer": "A"}))
                .send()
                .await
                .unwrap()
                .status()
                .as_u16()
        }));
    }
    for handle in handles {
        assert_eq!(handle.await.unwrap(), 200);
    }

    let results: Value = client
        .get(format!("{}/api/quizzes/{}/results", address, id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(results["pointer"], 20);
    assert_eq!(results["players"][0]["score"], 20);
    assert_eq!(results["state"], "complete");
}

#[tokio::test]
async fn failed_save_does_not_keep_the_quiz() {
    let config = Config::ephemeral("http://quiz.test/".parse().unwrap());
    let state = AppState::new(QuizManager::new(), Arc::new(ReadOnlyStore), config);
    let manager = state.manager.clone();
    let app = routes::create_router(state);

    // Retrying after a 500 must not append the questions twice.
    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/quizzes")
                    .header("content-type", "application/json")
                    .body(Body::from(geo_quiz().to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 500);
    }

    assert!(manager.lock().await.catalog().is_empty());
}

#[tokio::test]
async fn quiz_text_is_returned_unescaped() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let created: Value = client
        .post(format!("{}/api/quizzes", address))
        .json(&json!({
            "name": "Q&A",
            "questions": [{"text": "Is 2 < 3?", "options": ["yes", "no"], "answer": "yes"}]
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(created["name"], "Q&A");

    let quiz: Value = client
        .get(format!("{}/api/quizzes/{}", address, created["id"]))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(quiz["questions"][0]["text"], "Is 2 < 3?");

    let rejected = client
        .post(format!("{}/api/quizzes", address))
        .json(&json!({
            "name": "Sneaky",
            "questions": [{"text": "<img src=x onerror=alert(1)>", "options": ["a", "b"], "answer": "a"}]
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(rejected.status().as_u16(), 400);
}
