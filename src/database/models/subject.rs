use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Subject {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub chapters: i32,
    pub created_at: DateTime<Utc>,
}

impl Subject {
    /// Built-in subject list served when the database is unreachable, so the
    /// storefront landing data keeps rendering through an outage.
    pub fn defaults() -> Vec<Subject> {
        let now = Utc::now();
        let subject = |n: u128, name: &str, description: &str, icon: &str, chapters: i32| Subject {
            id: Uuid::from_u128(n),
            name: name.to_string(),
            description: description.to_string(),
            icon: icon.to_string(),
            chapters,
            created_at: now,
        };

        vec![
            subject(
                1,
                "Physics",
                "Comprehensive physics notes and problem-solving techniques",
                "atom",
                25,
            ),
            subject(
                2,
                "Chemistry",
                "Organic, Inorganic, and Physical chemistry concepts",
                "flask",
                28,
            ),
            subject(
                3,
                "Biology",
                "Botany and Zoology for NEET preparation",
                "microscope",
                38,
            ),
            subject(
                4,
                "Mathematics",
                "Advanced mathematics for JEE preparation",
                "calculator",
                22,
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_the_four_streams() {
        let subjects = Subject::defaults();
        let names: Vec<&str> = subjects.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Physics", "Chemistry", "Biology", "Mathematics"]);
        // Stable ids so repeated fallbacks don't churn client keys
        assert_eq!(subjects[0].id, Uuid::from_u128(1));
    }
}
