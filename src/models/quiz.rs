// src/models/quiz.rs

use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Deserializer, Serialize};
use validator::{Validate, ValidationError};

use crate::utils::html::contains_markup;

/// Numeric quiz identifier, assigned sequentially and kept across merges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuizId(pub i64);

impl fmt::Display for QuizId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub text: String,

    /// Options in display order.
    pub options: Vec<String>,

    /// The correct option, stored by value rather than by index.
    pub answer: String,
}

impl Question {
    /// Exact, case-sensitive comparison against the stored answer.
    pub fn is_correct(&self, answer_text: &str) -> bool {
        self.answer == answer_text
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quiz {
    pub id: QuizId,
    pub name: String,
    pub questions: Vec<Question>,
}

/// The persisted collection of quiz definitions, keyed by quiz name.
///
/// Serializes as a flat map: `{"Geo": {"id": 1, "name": "Geo", "questions": [...]}}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    pub quizzes: BTreeMap<String, Quiz>,
}

impl Catalog {
    pub fn is_empty(&self) -> bool {
        self.quizzes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.quizzes.len()
    }

    pub fn get(&self, id: QuizId) -> Option<&Quiz> {
        self.quizzes.values().find(|q| q.id == id)
    }

    pub fn get_by_name(&self, name: &str) -> Option<&Quiz> {
        self.quizzes.get(name)
    }

    /// Next free id; ids are never reused while the catalog lives.
    pub fn next_id(&self) -> QuizId {
        let max = self.quizzes.values().map(|q| q.id.0).max().unwrap_or(0);
        QuizId(max + 1)
    }

    /// Appends to the quiz named `name`, or creates it. Returns the quiz id.
    pub fn merge(&mut self, name: String, questions: Vec<Question>) -> QuizId {
        if let Some(existing) = self.quizzes.get_mut(&name) {
            existing.questions.extend(questions);
            return existing.id;
        }

        let id = self.next_id();
        self.quizzes.insert(
            name.clone(),
            Quiz {
                id,
                name,
                questions,
            },
        );
        id
    }
}

/// Question as shown to players: the answer is withheld.
#[derive(Debug, Clone, Serialize)]
pub struct PublicQuestion {
    pub index: usize,
    pub text: String,
    pub options: Vec<String>,
}

impl PublicQuestion {
    pub fn new(index: usize, question: &Question) -> Self {
        Self {
            index,
            text: question.text.clone(),
            options: question.options.clone(),
        }
    }
}

/// Row of the quiz listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizSummary {
    pub id: QuizId,
    pub name: String,
    pub question_count: usize,
}

impl From<&Quiz> for QuizSummary {
    fn from(quiz: &Quiz) -> Self {
        Self {
            id: quiz.id,
            name: quiz.name.clone(),
            question_count: quiz.questions.len(),
        }
    }
}

/// Quiz as shown on the play page.
#[derive(Debug, Clone, Serialize)]
pub struct PublicQuiz {
    pub id: QuizId,
    pub name: String,
    pub questions: Vec<PublicQuestion>,
}

impl From<&Quiz> for PublicQuiz {
    fn from(quiz: &Quiz) -> Self {
        Self {
            id: quiz.id,
            name: quiz.name.clone(),
            questions: quiz
                .questions
                .iter()
                .enumerate()
                .map(|(i, q)| PublicQuestion::new(i, q))
                .collect(),
        }
    }
}

/// DTO for creating (or extending) a quiz.
///
/// Missing fields default to empty so they surface as validation errors
/// instead of deserialization failures.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CreateQuizRequest {
    #[serde(default)]
    #[validate(
        length(min = 1, max = 100, message = "Quiz name must be between 1 and 100 characters."),
        custom(function = validate_plain_text)
    )]
    pub name: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "A quiz needs at least one question."), nested)]
    pub questions: Vec<QuestionInput>,
}

/// DTO for one question of a create-quiz submission.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[validate(schema(function = validate_answer_in_options))]
pub struct QuestionInput {
    #[serde(default)]
    #[validate(length(min = 1, max = 250), custom(function = validate_plain_text))]
    pub text: String,

    /// Either a JSON list or a single `|`-separated string.
    #[serde(default, deserialize_with = "deserialize_options")]
    #[validate(custom(function = validate_options))]
    pub options: Vec<String>,

    #[serde(default)]
    #[validate(length(min = 1, max = 100))]
    pub answer: String,
}

impl QuestionInput {
    pub fn new(text: &str, options: &[&str], answer: &str) -> Self {
        Self {
            text: text.to_string(),
            options: options.iter().map(|o| o.to_string()).collect(),
            answer: answer.to_string(),
        }
    }
}

impl CreateQuizRequest {
    /// Trims every field. Text is stored as submitted otherwise; markup is
    /// rejected by validation rather than rewritten.
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            questions: self
                .questions
                .into_iter()
                .map(|q| QuestionInput {
                    text: q.text.trim().to_string(),
                    options: q
                        .options
                        .iter()
                        .map(|o| o.trim().to_string())
                        .filter(|o| !o.is_empty())
                        .collect(),
                    answer: q.answer.trim().to_string(),
                })
                .collect(),
        }
    }

    pub fn into_questions(self) -> (String, Vec<Question>) {
        let questions = self
            .questions
            .into_iter()
            .map(|q| Question {
                text: q.text,
                options: q.options,
                answer: q.answer,
            })
            .collect();
        (self.name, questions)
    }
}

fn validate_options(options: &[String]) -> Result<(), ValidationError> {
    if options.len() < 2 {
        return Err(ValidationError::new("at_least_two_options"));
    }
    for opt in options {
        if opt.len() > 100 {
            return Err(ValidationError::new("option_too_long"));
        }
        if opt.contains('|') {
            return Err(ValidationError::new("option_contains_separator"));
        }
    }
    Ok(())
}

fn validate_plain_text(text: &str) -> Result<(), ValidationError> {
    if contains_markup(text) {
        return Err(ValidationError::new("markup_not_allowed"));
    }
    Ok(())
}

fn validate_answer_in_options(question: &QuestionInput) -> Result<(), ValidationError> {
    if !question.answer.is_empty() && !question.options.contains(&question.answer) {
        return Err(ValidationError::new("answer_not_an_option"));
    }
    Ok(())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OptionsInput {
    List(Vec<String>),
    Joined(String),
}

fn deserialize_options<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match OptionsInput::deserialize(deserializer)? {
        OptionsInput::List(list) => list,
        OptionsInput::Joined(joined) => split_options(&joined),
    })
}

/// Splits the `|`-separated option format used by forms and the SQLite schema.
pub fn split_options(joined: &str) -> Vec<String> {
    joined
        .split('|')
        .map(|o| o.trim().to_string())
        .filter(|o| !o.is_empty())
        .collect()
}
