//! Server-side grading for test submissions.
//!
//! Scoring is authoritative here: clients only ever see redacted question
//! lists, and both manual submission and countdown expiry land on the same
//! grading path.

use serde::Serialize;
use std::collections::HashMap;
use uuid::Uuid;

use crate::database::models::test::Question;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Grade {
    /// Percentage score, rounded to two decimal places.
    pub score: f64,
    pub correct_answers: i32,
    pub total_questions: i32,
}

/// Grade a submitted answer map against a test's question list.
///
/// An answer counts iff the submitted string for that question id equals the
/// stored correct answer exactly. A test with no questions grades to 0.
pub fn grade(questions: &[Question], answers: &HashMap<Uuid, String>) -> Grade {
    let total_questions = questions.len() as i32;
    let correct_answers = questions
        .iter()
        .filter(|q| answers.get(&q.id).is_some_and(|a| *a == q.correct_answer))
        .count() as i32;

    let score = if total_questions > 0 {
        let raw = (correct_answers as f64 / total_questions as f64) * 100.0;
        (raw * 100.0).round() / 100.0
    } else {
        0.0
    };

    Grade {
        score,
        correct_answers,
        total_questions,
    }
}

/// Seconds spent on a test, derived from the countdown at submission time.
///
/// `allotted - remaining`, clamped to the `[0, allotted]` range so a clock
/// that drifted past the allotment (or a remaining value larger than it)
/// never produces a negative or inflated figure.
pub fn time_spent(duration_minutes: i32, time_remaining_secs: i64) -> i64 {
    let allotted = i64::from(duration_minutes) * 60;
    (allotted - time_remaining_secs).clamp(0, allotted)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(correct: &str) -> Question {
        Question {
            id: Uuid::new_v4(),
            text: "The SI unit of force is:".to_string(),
            options: vec![
                "Joule".to_string(),
                "Newton".to_string(),
                "Watt".to_string(),
                "Pascal".to_string(),
            ],
            correct_answer: correct.to_string(),
        }
    }

    #[test]
    fn score_is_percentage_of_matches_rounded_to_two_decimals() {
        let questions = vec![question("Newton"), question("Newton"), question("Zero")];
        let mut answers = HashMap::new();
        answers.insert(questions[0].id, "Newton".to_string());
        answers.insert(questions[1].id, "Joule".to_string());
        answers.insert(questions[2].id, "Zero".to_string());

        let grade = grade(&questions, &answers);
        assert_eq!(grade.correct_answers, 2);
        assert_eq!(grade.total_questions, 3);
        // 2/3 = 66.666..., rounded to two decimals
        assert_eq!(grade.score, 66.67);
    }

    #[test]
    fn unanswered_questions_count_as_wrong() {
        let questions = vec![question("Newton"), question("Newton")];
        let mut answers = HashMap::new();
        answers.insert(questions[0].id, "Newton".to_string());

        let grade = grade(&questions, &answers);
        assert_eq!(grade.correct_answers, 1);
        assert_eq!(grade.score, 50.0);
    }

    #[test]
    fn empty_test_scores_zero_without_panicking() {
        let grade = grade(&[], &HashMap::new());
        assert_eq!(grade.score, 0.0);
        assert_eq!(grade.correct_answers, 0);
        assert_eq!(grade.total_questions, 0);
    }

    #[test]
    fn answers_for_unknown_questions_are_ignored() {
        let questions = vec![question("Newton")];
        let mut answers = HashMap::new();
        answers.insert(Uuid::new_v4(), "Newton".to_string());

        let grade = grade(&questions, &answers);
        assert_eq!(grade.correct_answers, 0);
        assert_eq!(grade.score, 0.0);
    }

    #[test]
    fn time_spent_is_allotment_minus_remaining() {
        // 60 minute test submitted with 20 minutes left
        assert_eq!(time_spent(60, 20 * 60), 40 * 60);
    }

    #[test]
    fn time_spent_on_expiry_equals_full_allotment() {
        assert_eq!(time_spent(45, 0), 45 * 60);
    }

    #[test]
    fn time_spent_never_goes_negative_or_past_allotment() {
        // Remaining larger than the allotment clamps to zero spent
        assert_eq!(time_spent(10, 2_000), 0);
        // Negative remaining (client clock drift) clamps to the allotment
        assert_eq!(time_spent(10, -30), 600);
    }
}
