use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TestAttempt {
    pub id: Uuid,
    pub user_id: Uuid,
    pub test_id: Uuid,
    /// Question id -> submitted answer.
    #[sqlx(json)]
    pub answers: HashMap<Uuid, String>,
    pub score: f64,
    pub correct_answers: i32,
    pub total_questions: i32,
    pub time_spent_secs: i32,
    pub submitted_at: DateTime<Utc>,
}

/// Dashboard quick-stats aggregate over a user's attempts.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AttemptSummary {
    pub tests_taken: i64,
    pub average_score: f64,
    pub total_time_secs: i64,
}
