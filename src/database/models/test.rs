use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: Uuid,
    pub text: String,
    pub options: Vec<String>,
    pub correct_answer: String,
}

/// Full test row, correct answers included. Only grading and the admin
/// surface see this; public reads go through [`TestView`].
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Test {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub category: String,
    pub duration_minutes: i32,
    pub difficulty: String,
    #[sqlx(json)]
    pub questions: Vec<Question>,
    pub created_at: DateTime<Utc>,
}

/// A question with the correct answer stripped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionView {
    pub id: Uuid,
    pub text: String,
    pub options: Vec<String>,
}

impl From<Question> for QuestionView {
    fn from(q: Question) -> Self {
        Self {
            id: q.id,
            text: q.text,
            options: q.options,
        }
    }
}

/// Client-facing test: same shape as [`Test`] minus the answer key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestView {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub category: String,
    pub duration_minutes: i32,
    pub difficulty: String,
    pub question_count: usize,
    pub questions: Vec<QuestionView>,
    pub created_at: DateTime<Utc>,
}

impl From<Test> for TestView {
    fn from(test: Test) -> Self {
        Self {
            id: test.id,
            name: test.name,
            description: test.description,
            category: test.category,
            duration_minutes: test.duration_minutes,
            difficulty: test.difficulty,
            question_count: test.questions.len(),
            questions: test.questions.into_iter().map(QuestionView::from).collect(),
            created_at: test.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_strips_correct_answers() {
        let test = Test {
            id: Uuid::new_v4(),
            name: "Mechanics Sectional".to_string(),
            description: String::new(),
            category: "sectional".to_string(),
            duration_minutes: 60,
            difficulty: "medium".to_string(),
            questions: vec![Question {
                id: Uuid::new_v4(),
                text: "The SI unit of force is:".to_string(),
                options: vec!["Joule".to_string(), "Newton".to_string()],
                correct_answer: "Newton".to_string(),
            }],
            created_at: Utc::now(),
        };

        let view = TestView::from(test);
        assert_eq!(view.question_count, 1);

        let encoded = serde_json::to_string(&view).unwrap();
        assert!(!encoded.contains("correct_answer"));
        assert!(encoded.contains("Newton")); // options survive, the key does not leak separately
    }
}
