// src/manager.rs

use std::collections::HashMap;

use validator::Validate;

use crate::{
    error::AppError,
    models::{
        quiz::{Catalog, CreateQuizRequest, Quiz, QuestionInput, QuizId, QuizSummary},
        session::{
            AdvanceResult, CurrentQuestion, Player, PlayerScore, Session, SessionResults,
            SessionState, SessionToken,
        },
    },
};

/// Owns the quiz catalog and every live session.
///
/// The manager itself does no locking; the server wraps it in a single
/// `tokio::sync::Mutex` (see `AppState`) so each operation is one atomic
/// read-modify-write.
#[derive(Debug, Default)]
pub struct QuizManager {
    catalog: Catalog,
    sessions: HashMap<QuizId, Session>,
}

impl QuizManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from a persisted catalog with no live sessions.
    pub fn from_catalog(catalog: Catalog) -> Self {
        Self {
            catalog,
            sessions: HashMap::new(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Puts back a catalog taken before a mutation that could not be persisted.
    ///
    /// Live sessions are kept; a session of a quiz missing from `catalog`
    /// reports that quiz as not found.
    pub fn restore_catalog(&mut self, catalog: Catalog) {
        self.catalog = catalog;
    }

    /// Creates a quiz, or appends `questions` to the quiz already named `name`.
    pub fn create_quiz(
        &mut self,
        name: &str,
        questions: Vec<QuestionInput>,
    ) -> Result<QuizId, AppError> {
        let request = CreateQuizRequest {
            name: name.to_string(),
            questions,
        }
        .normalized();
        request.validate()?;

        let (name, questions) = request.into_questions();
        let added = questions.len();
        let merged = self.catalog.get_by_name(&name).is_some();
        let id = self.catalog.merge(name, questions);

        if merged {
            tracing::info!(quiz_id = %id, added, "Appended questions to existing quiz");
        } else {
            tracing::info!(quiz_id = %id, added, "Created quiz");
        }
        Ok(id)
    }

    pub fn list_quizzes(&self) -> Vec<QuizSummary> {
        let mut list: Vec<QuizSummary> = self.catalog.quizzes.values().map(QuizSummary::from).collect();
        list.sort_by_key(|q| q.id);
        list
    }

    pub fn quiz(&self, quiz_id: QuizId) -> Result<&Quiz, AppError> {
        self.catalog
            .get(quiz_id)
            .ok_or_else(|| AppError::NotFound(format!("Quiz {} not found", quiz_id)))
    }

    /// Registers `player_name` with score 0.
    ///
    /// Re-joining under an existing name resets that player's score; the
    /// shared pointer keeps its position, which may be mid-quiz.
    pub fn join(&mut self, quiz_id: QuizId, player_name: &str) -> Result<SessionToken, AppError> {
        let question_count = self.quiz(quiz_id)?.questions.len();
        let player_name = roster_key(player_name);
        if player_name.is_empty() {
            return Err(AppError::Validation("Player name must not be empty".to_string()));
        }

        let session = self.sessions.entry(quiz_id).or_insert_with(|| {
            tracing::info!(quiz_id = %quiz_id, "Session started");
            Session::new()
        });

        let rejoined = session
            .players
            .insert(player_name.to_string(), Player::new(player_name))
            .is_some();
        if rejoined {
            tracing::warn!(quiz_id = %quiz_id, player = player_name, "Player re-joined; score reset to 0");
        } else {
            tracing::info!(quiz_id = %quiz_id, player = player_name, "Player joined");
        }

        Ok(SessionToken {
            quiz_id,
            player: player_name.to_string(),
            state: state_of(session, question_count),
        })
    }

    pub fn state(&self, quiz_id: QuizId) -> Result<SessionState, AppError> {
        let question_count = self.quiz(quiz_id)?.questions.len();
        Ok(match self.sessions.get(&quiz_id) {
            Some(session) => state_of(session, question_count),
            None => SessionState::NotStarted,
        })
    }

    pub fn current_question(&self, quiz_id: QuizId) -> Result<CurrentQuestion, AppError> {
        let quiz = self.quiz(quiz_id)?;
        let session = self.session(quiz_id)?;

        Ok(match quiz.questions.get(session.pointer) {
            Some(question) => CurrentQuestion::Active {
                index: session.pointer,
                question: question.clone(),
            },
            None => CurrentQuestion::SessionComplete,
        })
    }

    /// Scores `answer_text` against the active question and advances the
    /// quiz-wide pointer, whoever answered.
    pub fn submit_answer(
        &mut self,
        quiz_id: QuizId,
        player_name: &str,
        answer_text: &str,
    ) -> Result<AdvanceResult, AppError> {
        let player_name = roster_key(player_name);
        let quiz = self
            .catalog
            .get(quiz_id)
            .ok_or_else(|| AppError::NotFound(format!("Quiz {} not found", quiz_id)))?;
        let session = self
            .sessions
            .get_mut(&quiz_id)
            .ok_or_else(|| AppError::NotFound(format!("Quiz {} has no players yet", quiz_id)))?;

        let player = session
            .players
            .get_mut(player_name)
            .ok_or_else(|| AppError::NotFound(format!("Player '{}' has not joined quiz {}", player_name, quiz_id)))?;

        let Some(question) = quiz.questions.get(session.pointer) else {
            return Err(AppError::Conflict(format!("Quiz {} is already complete", quiz_id)));
        };

        let correct = question.is_correct(answer_text);
        if correct {
            player.score += 1;
        }
        player.answered += 1;
        let score = player.score;

        session.pointer += 1;
        let complete = session.pointer >= quiz.questions.len();

        tracing::debug!(
            quiz_id = %quiz_id,
            player = player_name,
            correct,
            pointer = session.pointer,
            "Answer submitted"
        );
        if complete {
            tracing::info!(quiz_id = %quiz_id, "Session complete");
        }

        Ok(AdvanceResult {
            correct,
            score,
            complete,
        })
    }

    pub fn score(&self, quiz_id: QuizId, player_name: &str) -> Result<u32, AppError> {
        let player_name = roster_key(player_name);
        self.quiz(quiz_id)?;
        self.session(quiz_id)?
            .players
            .get(player_name)
            .map(|p| p.score)
            .ok_or_else(|| AppError::NotFound(format!("Player '{}' has not joined quiz {}", player_name, quiz_id)))
    }

    /// Every player's score, highest first, ties broken by name.
    pub fn results(&self, quiz_id: QuizId) -> Result<SessionResults, AppError> {
        let question_count = self.quiz(quiz_id)?.questions.len();

        let Some(session) = self.sessions.get(&quiz_id) else {
            return Ok(SessionResults {
                quiz_id,
                state: SessionState::NotStarted,
                pointer: 0,
                question_count,
                started_at: None,
                players: Vec::new(),
            });
        };

        let mut players: Vec<PlayerScore> = session
            .players
            .values()
            .map(|p| PlayerScore {
                player: p.name.clone(),
                score: p.score,
                answered: p.answered,
                joined_at: p.joined_at,
            })
            .collect();
        players.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.player.cmp(&b.player)));

        Ok(SessionResults {
            quiz_id,
            state: state_of(session, question_count),
            pointer: session.pointer,
            question_count,
            started_at: Some(session.started_at),
            players,
        })
    }

    fn session(&self, quiz_id: QuizId) -> Result<&Session, AppError> {
        self.sessions
            .get(&quiz_id)
            .ok_or_else(|| AppError::NotFound(format!("Quiz {} has no players yet", quiz_id)))
    }
}

/// Player names are keyed without surrounding whitespace in every operation.
fn roster_key(player_name: &str) -> &str {
    player_name.trim()
}

fn state_of(session: &Session, question_count: usize) -> SessionState {
    if session.pointer >= question_count {
        SessionState::Complete
    } else {
        SessionState::InProgress
    }
}
