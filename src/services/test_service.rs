use serde::Deserialize;
use sqlx::types::Json;
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::attempt::{AttemptSummary, TestAttempt};
use crate::database::models::test::{Question, Test};
use crate::scoring;

#[derive(Debug, thiserror::Error)]
pub enum TestError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Database manager error: {0}")]
    Manager(#[from] DatabaseError),
    #[error("Test not found")]
    NotFound,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewQuestion {
    pub text: String,
    pub options: Vec<String>,
    pub correct_answer: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewTest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category: String,
    pub duration_minutes: i32,
    #[serde(default = "default_difficulty")]
    pub difficulty: String,
    pub questions: Vec<NewQuestion>,
}

fn default_difficulty() -> String {
    "medium".to_string()
}

pub struct TestService {
    pool: PgPool,
}

impl TestService {
    pub async fn new() -> Result<Self, TestError> {
        let pool = DatabaseManager::app_pool().await?;
        Ok(Self { pool })
    }

    pub async fn list_tests(&self, category: Option<&str>) -> Result<Vec<Test>, TestError> {
        let tests = match category {
            Some(category) => {
                sqlx::query_as::<_, Test>(
                    "SELECT * FROM tests WHERE category = $1 ORDER BY created_at DESC",
                )
                .bind(category)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Test>("SELECT * FROM tests ORDER BY created_at DESC")
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        Ok(tests)
    }

    pub async fn get_test(&self, test_id: Uuid) -> Result<Test, TestError> {
        sqlx::query_as::<_, Test>("SELECT * FROM tests WHERE id = $1")
            .bind(test_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(TestError::NotFound)
    }

    pub async fn create_test(&self, new: NewTest) -> Result<Test, TestError> {
        // Question ids are assigned server-side so answer maps key off ids
        // the storefront received, never client-invented ones.
        let questions: Vec<Question> = new
            .questions
            .into_iter()
            .map(|q| Question {
                id: Uuid::new_v4(),
                text: q.text,
                options: q.options,
                correct_answer: q.correct_answer,
            })
            .collect();

        let test = sqlx::query_as::<_, Test>(
            r#"
            INSERT INTO tests (name, description, category, duration_minutes, difficulty, questions)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(&new.name)
        .bind(&new.description)
        .bind(&new.category)
        .bind(new.duration_minutes)
        .bind(&new.difficulty)
        .bind(Json(&questions))
        .fetch_one(&self.pool)
        .await?;

        Ok(test)
    }

    /// Grade and persist a submission. Manual submissions and countdown
    /// expiry both land here; expiry is a submission with zero remaining.
    pub async fn submit_attempt(
        &self,
        user_id: Uuid,
        test_id: Uuid,
        answers: HashMap<Uuid, String>,
        time_remaining_secs: i64,
    ) -> Result<TestAttempt, TestError> {
        let test = self.get_test(test_id).await?;

        let grade = scoring::grade(&test.questions, &answers);
        let time_spent = scoring::time_spent(test.duration_minutes, time_remaining_secs);

        let attempt = sqlx::query_as::<_, TestAttempt>(
            r#"
            INSERT INTO test_attempts
                (user_id, test_id, answers, score, correct_answers, total_questions, time_spent_secs)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(test_id)
        .bind(Json(&answers))
        .bind(grade.score)
        .bind(grade.correct_answers)
        .bind(grade.total_questions)
        .bind(time_spent as i32)
        .fetch_one(&self.pool)
        .await?;

        Ok(attempt)
    }

    pub async fn list_attempts(&self, user_id: Uuid) -> Result<Vec<TestAttempt>, TestError> {
        let attempts = sqlx::query_as::<_, TestAttempt>(
            "SELECT * FROM test_attempts WHERE user_id = $1 ORDER BY submitted_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(attempts)
    }

    pub async fn attempt_summary(&self, user_id: Uuid) -> Result<AttemptSummary, TestError> {
        let mut summary = sqlx::query_as::<_, AttemptSummary>(
            r#"
            SELECT
                COUNT(*) AS tests_taken,
                COALESCE(AVG(score), 0) AS average_score,
                COALESCE(SUM(time_spent_secs), 0)::BIGINT AS total_time_secs
            FROM test_attempts
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        summary.average_score = (summary.average_score * 100.0).round() / 100.0;
        Ok(summary)
    }
}
