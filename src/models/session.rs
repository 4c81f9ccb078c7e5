// src/models/session.rs

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::quiz::{PublicQuestion, Question, QuizId};

/// A player registered in one quiz session.
#[derive(Debug, Clone, Serialize)]
pub struct Player {
    pub name: String,
    pub score: u32,

    /// Answers submitted since the last (re)join.
    pub answered: u32,

    pub joined_at: DateTime<Utc>,
}

impl Player {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            score: 0,
            answered: 0,
            joined_at: Utc::now(),
        }
    }
}

/// Live state of one quiz being played.
#[derive(Debug, Clone)]
pub struct Session {
    pub players: BTreeMap<String, Player>,

    /// Index of the active question, shared by every player of the quiz.
    pub pointer: usize,

    pub started_at: DateTime<Utc>,
}

impl Session {
    pub fn new() -> Self {
        Self {
            players: BTreeMap::new(),
            pointer: 0,
            started_at: Utc::now(),
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    NotStarted,
    InProgress,
    Complete,
}

/// Returned by `join`; identifies the player within the quiz session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionToken {
    pub quiz_id: QuizId,
    pub player: String,
    pub state: SessionState,
}

/// What the session currently asks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CurrentQuestion {
    Active { index: usize, question: Question },
    SessionComplete,
}

/// Wire form of [`CurrentQuestion`] with the answer withheld.
///
/// `{"status": "active", "question": {...}}` or `{"status": "complete"}`.
#[derive(Debug, Serialize)]
#[serde(tag = "status", content = "question", rename_all = "snake_case")]
pub enum CurrentQuestionResponse {
    Active(PublicQuestion),
    Complete,
}

impl From<CurrentQuestion> for CurrentQuestionResponse {
    fn from(current: CurrentQuestion) -> Self {
        match current {
            CurrentQuestion::Active { index, question } => {
                Self::Active(PublicQuestion::new(index, &question))
            }
            CurrentQuestion::SessionComplete => Self::Complete,
        }
    }
}

/// Outcome of `submit_answer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvanceResult {
    pub correct: bool,
    pub score: u32,
    pub complete: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerScore {
    pub player: String,
    pub score: u32,
    pub answered: u32,
    pub joined_at: DateTime<Utc>,
}

/// Scoreboard of one session, highest score first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResults {
    pub quiz_id: QuizId,
    pub state: SessionState,
    pub pointer: usize,
    pub question_count: usize,

    /// When the first player joined; `None` before that.
    pub started_at: Option<DateTime<Utc>>,

    pub players: Vec<PlayerScore>,
}

/// DTO for joining a quiz.
#[derive(Debug, Deserialize, Validate)]
pub struct JoinRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 50, message = "Player name must be between 1 and 50 characters."))]
    pub player_name: String,
}

/// DTO for answering the active question.
#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub player_name: String,
    pub answer: String,
}
