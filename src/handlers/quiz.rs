// src/handlers/quiz.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;

use crate::{
    error::AppError,
    models::quiz::{CreateQuizRequest, PublicQuiz, QuizId},
    state::AppState,
    utils::link::join_url,
};

/// Lists every quiz in the catalog.
pub async fn list_quizzes(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let manager = state.manager.lock().await;
    Ok(Json(manager.list_quizzes()))
}

/// Creates a quiz, or appends the submitted questions to the quiz with the same name.
///
/// * Normalizes and validates the payload.
/// * Persists the whole catalog before responding; a failed save is rolled back.
/// * Returns the quiz id together with its join URL.
pub async fn create_quiz(
    State(state): State<AppState>,
    Json(payload): Json<CreateQuizRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut manager = state.manager.lock().await;
    let snapshot = manager.catalog().clone();
    let id = manager.create_quiz(&payload.name, payload.questions)?;

    // Saved under the lock so snapshots land in mutation order.
    if let Err(e) = state.store.save(manager.catalog()).await {
        tracing::error!("Failed to persist catalog after creating quiz {}: {}", id, e);
        manager.restore_catalog(snapshot);
        return Err(e);
    }

    let quiz = manager.quiz(id)?;
    let link = join_url(&state.config.public_base_url, id)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "id": id,
            "name": quiz.name,
            "question_count": quiz.questions.len(),
            "join_url": link.as_str(),
        })),
    ))
}

/// Returns a quiz with its questions; answers are withheld.
pub async fn get_quiz(
    State(state): State<AppState>,
    Path(id): Path<QuizId>,
) -> Result<impl IntoResponse, AppError> {
    let manager = state.manager.lock().await;
    let quiz = manager.quiz(id)?;
    Ok(Json(PublicQuiz::from(quiz)))
}

/// Returns the shareable join URL a QR code should encode.
pub async fn join_link(
    State(state): State<AppState>,
    Path(id): Path<QuizId>,
) -> Result<impl IntoResponse, AppError> {
    state.manager.lock().await.quiz(id)?;
    let link = join_url(&state.config.public_base_url, id)?;
    Ok(Json(json!({ "id": id, "join_url": link.as_str() })))
}
