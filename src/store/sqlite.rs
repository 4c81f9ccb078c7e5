// src/store/sqlite.rs

use std::{collections::BTreeMap, time::Duration};

use async_trait::async_trait;
use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};

use crate::{
    error::AppError,
    models::quiz::{Catalog, Question, Quiz, QuizId, split_options},
    store::CatalogStore,
};

/// Row of the `quiz` table.
#[derive(sqlx::FromRow)]
struct QuizRow {
    id: i64,
    name: String,
}

/// Row of the `question` table.
#[derive(sqlx::FromRow)]
struct QuestionRow {
    quiz_id: i64,
    question_text: String,
    options: String,
    correct_answer: String,
}

/// Relational catalog backed by SQLite.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Connects to `database_url` and applies the embedded migrations.
    pub async fn connect(database_url: &str) -> Result<Self, AppError> {
        // Every connection to `sqlite::memory:` opens its own database.
        let max_connections = if database_url.contains(":memory:") { 1 } else { 5 };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(database_url)
            .await
            .map_err(|e| {
                tracing::error!("Failed to open catalog database: {:?}", e);
                AppError::InternalServerError(e.to_string())
            })?;

        Self::from_pool(pool).await
    }

    pub async fn from_pool(pool: SqlitePool) -> Result<Self, AppError> {
        tracing::info!("Running migrations...");
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }
}

#[async_trait]
impl CatalogStore for SqliteStore {
    async fn load(&self) -> Result<Catalog, AppError> {
        let quizzes: Vec<QuizRow> = sqlx::query_as("SELECT id, name FROM quiz ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        let questions: Vec<QuestionRow> = sqlx::query_as(
            r#"
            SELECT quiz_id, question_text, options, correct_answer
            FROM question
            ORDER BY quiz_id, position
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut by_quiz: BTreeMap<i64, Vec<Question>> = BTreeMap::new();
        for row in questions {
            by_quiz.entry(row.quiz_id).or_default().push(Question {
                text: row.question_text,
                options: split_options(&row.options),
                answer: row.correct_answer,
            });
        }

        let mut catalog = Catalog::default();
        for row in quizzes {
            let quiz = Quiz {
                id: QuizId(row.id),
                name: row.name.clone(),
                questions: by_quiz.remove(&row.id).unwrap_or_default(),
            };
            catalog.quizzes.insert(row.name, quiz);
        }

        tracing::info!("Loaded {} quizzes from database", catalog.len());
        Ok(catalog)
    }

    /// Replaces the stored catalog in one transaction.
    async fn save(&self, catalog: &Catalog) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM question").execute(&mut *tx).await?;
        sqlx::query("DELETE FROM quiz").execute(&mut *tx).await?;

        for quiz in catalog.quizzes.values() {
            sqlx::query("INSERT INTO quiz (id, name) VALUES (?, ?)")
                .bind(quiz.id.0)
                .bind(&quiz.name)
                .execute(&mut *tx)
                .await?;

            for (position, question) in quiz.questions.iter().enumerate() {
                sqlx::query(
                    r#"
                    INSERT INTO question (quiz_id, position, question_text, options, correct_answer)
                    VALUES (?, ?, ?, ?, ?)
                    "#,
                )
                .bind(quiz.id.0)
                .bind(position as i64)
                .bind(&question.text)
                .bind(question.options.join("|"))
                .bind(&question.answer)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;
        tracing::debug!("Saved {} quizzes to database", catalog.len());
        Ok(())
    }
}
