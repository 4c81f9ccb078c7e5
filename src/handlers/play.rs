// src/handlers/play.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use validator::Validate;

use crate::{
    error::AppError,
    models::{
        quiz::QuizId,
        session::{AnswerRequest, CurrentQuestionResponse, JoinRequest},
    },
    state::AppState,
};

/// Registers a player in the quiz session (resets the score on re-join).
pub async fn join(
    State(state): State<AppState>,
    Path(id): Path<QuizId>,
    Json(payload): Json<JoinRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let token = state.manager.lock().await.join(id, &payload.player_name)?;
    Ok((StatusCode::CREATED, Json(token)))
}

/// Returns the active question, or `{"status": "complete"}`.
///
/// Players poll this; there is no push channel.
pub async fn current_question(
    State(state): State<AppState>,
    Path(id): Path<QuizId>,
) -> Result<impl IntoResponse, AppError> {
    let current = state.manager.lock().await.current_question(id)?;
    Ok(Json(CurrentQuestionResponse::from(current)))
}

/// Scores an answer to the active question and advances the quiz.
pub async fn submit_answer(
    State(state): State<AppState>,
    Path(id): Path<QuizId>,
    Json(payload): Json<AnswerRequest>,
) -> Result<impl IntoResponse, AppError> {
    let result = state
        .manager
        .lock()
        .await
        .submit_answer(id, &payload.player_name, &payload.answer)?;
    Ok(Json(result))
}

pub async fn score(
    State(state): State<AppState>,
    Path((id, player)): Path<(QuizId, String)>,
) -> Result<impl IntoResponse, AppError> {
    let score = state.manager.lock().await.score(id, &player)?;
    Ok(Json(json!({ "player": player, "score": score })))
}

/// Scoreboard for the quiz session, highest score first.
pub async fn results(
    State(state): State<AppState>,
    Path(id): Path<QuizId>,
) -> Result<impl IntoResponse, AppError> {
    let results = state.manager.lock().await.results(id)?;
    Ok(Json(results))
}
