use serde_json::json;

use crate::auth::password;
use crate::cli::OutputFormat;
use crate::database::manager::DatabaseManager;
use crate::services::catalog_service::NewSubject;
use crate::services::test_service::{NewQuestion, NewTest};
use crate::services::{CatalogService, TestService};

const DEFAULT_ADMIN_EMAIL: &str = "admin@studydesk.in";
const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

/// Wipe the database and load the sample catalog, tests, and admin account.
pub async fn handle(output_format: OutputFormat) -> anyhow::Result<()> {
    clear_existing_data().await?;

    let catalog = CatalogService::new().await?;
    let mut subjects = 0usize;
    for subject in sample_subjects() {
        catalog.create_subject(subject).await?;
        subjects += 1;
    }

    let tests_service = TestService::new().await?;
    let mut tests = 0usize;
    for test in sample_tests() {
        tests_service.create_test(test).await?;
        tests += 1;
    }

    let admin_email = create_admin_user().await?;

    match output_format {
        OutputFormat::Json => println!(
            "{}",
            json!({ "subjects": subjects, "tests": tests, "admin": admin_email })
        ),
        OutputFormat::Text => {
            println!("Seeded {} subjects and {} tests", subjects, tests);
            println!("Admin account: {}", admin_email);
        }
    }

    Ok(())
}

async fn clear_existing_data() -> anyhow::Result<()> {
    let pool = DatabaseManager::app_pool().await?;

    // FK order: children before parents
    for table in [
        "material_downloads",
        "purchases",
        "payments",
        "test_attempts",
        "materials",
        "tests",
        "subjects",
        "users",
    ] {
        sqlx::query(&format!("DELETE FROM {}", table))
            .execute(&pool)
            .await?;
    }

    Ok(())
}

async fn create_admin_user() -> anyhow::Result<String> {
    let pool = DatabaseManager::app_pool().await?;

    let email =
        std::env::var("STUDYDESK_ADMIN_EMAIL").unwrap_or_else(|_| DEFAULT_ADMIN_EMAIL.to_string());
    let plain = std::env::var("STUDYDESK_ADMIN_PASSWORD")
        .unwrap_or_else(|_| DEFAULT_ADMIN_PASSWORD.to_string());
    let password_hash = password::hash_password(&plain)?;

    sqlx::query(
        r#"
        INSERT INTO users (name, email, password_hash, role)
        VALUES ('Admin User', $1, $2, 'admin')
        ON CONFLICT (email) DO NOTHING
        "#,
    )
    .bind(&email)
    .bind(&password_hash)
    .execute(&pool)
    .await?;

    Ok(email)
}

fn sample_subjects() -> Vec<NewSubject> {
    let subject = |name: &str, description: &str, icon: &str, chapters: i32| NewSubject {
        name: name.to_string(),
        description: description.to_string(),
        icon: icon.to_string(),
        chapters,
    };

    vec![
        subject(
            "Physics",
            "Comprehensive physics notes and problem-solving techniques",
            "atom",
            25,
        ),
        subject(
            "Chemistry",
            "Organic, Inorganic, and Physical chemistry concepts",
            "flask",
            28,
        ),
        subject(
            "Biology",
            "Botany and Zoology for NEET preparation",
            "microscope",
            38,
        ),
        subject(
            "Mathematics",
            "Advanced mathematics for JEE preparation",
            "calculator",
            22,
        ),
    ]
}

fn sample_tests() -> Vec<NewTest> {
    let q = |text: &str, options: &[&str], correct: &str| NewQuestion {
        text: text.to_string(),
        options: options.iter().map(|o| o.to_string()).collect(),
        correct_answer: correct.to_string(),
    };

    vec![
        NewTest {
            name: "Physics - Mechanics Sectional Test".to_string(),
            description: "Test your understanding of mechanics concepts including kinematics, dynamics, and work-energy theorem".to_string(),
            category: "sectional".to_string(),
            duration_minutes: 60,
            difficulty: "medium".to_string(),
            questions: vec![
                q(
                    "A car starts from rest and accelerates uniformly at 2 m/s² for 10 seconds. What is the final velocity?",
                    &["10 m/s", "20 m/s", "30 m/s", "40 m/s"],
                    "20 m/s",
                ),
                q(
                    "The SI unit of force is:",
                    &["Joule", "Newton", "Watt", "Pascal"],
                    "Newton",
                ),
                q(
                    "If a body is moving with constant velocity, its acceleration is:",
                    &["Zero", "Positive", "Negative", "Infinite"],
                    "Zero",
                ),
                q(
                    "The work done by a force is maximum when the angle between force and displacement is:",
                    &["0°", "45°", "90°", "180°"],
                    "0°",
                ),
                q(
                    "Which law states that for every action, there is an equal and opposite reaction?",
                    &["First law of motion", "Second law of motion", "Third law of motion", "Law of gravitation"],
                    "Third law of motion",
                ),
            ],
        },
        NewTest {
            name: "Chemistry - Organic Chemistry Basics".to_string(),
            description: "Fundamental concepts of organic chemistry including nomenclature and reactions".to_string(),
            category: "sectional".to_string(),
            duration_minutes: 45,
            difficulty: "easy".to_string(),
            questions: vec![
                q(
                    "The general formula for alkanes is:",
                    &["CnH2n", "CnH2n+2", "CnH2n-2", "CnHn"],
                    "CnH2n+2",
                ),
                q(
                    "Which of the following is an aromatic compound?",
                    &["Benzene", "Cyclohexane", "Ethane", "Propane"],
                    "Benzene",
                ),
                q(
                    "The functional group in alcohols is:",
                    &["-COOH", "-OH", "-CHO", "-NH2"],
                    "-OH",
                ),
                q(
                    "Isomers have:",
                    &["Same molecular formula", "Same structural formula", "Same properties", "Different molecular formula"],
                    "Same molecular formula",
                ),
            ],
        },
        NewTest {
            name: "JEE Main Mock Test 2025".to_string(),
            description: "Complete JEE Main pattern test covering Physics, Chemistry, and Mathematics".to_string(),
            category: "full-length".to_string(),
            duration_minutes: 180,
            difficulty: "hard".to_string(),
            questions: vec![
                q(
                    "A projectile is thrown at an angle of 45° with the horizontal. The range will be maximum when the angle is:",
                    &["30°", "45°", "60°", "90°"],
                    "45°",
                ),
                q(
                    "The dimensional formula for energy is:",
                    &["[ML²T⁻²]", "[MLT⁻²]", "[ML²T⁻¹]", "[MLT⁻¹]"],
                    "[ML²T⁻²]",
                ),
                q(
                    "The number of atoms in one mole of substance is:",
                    &["6.022 × 10²³", "6.022 × 10²²", "3.011 × 10²³", "1.202 × 10²⁴"],
                    "6.022 × 10²³",
                ),
            ],
        },
        NewTest {
            name: "NEET 2024 Previous Year Paper".to_string(),
            description: "Complete NEET 2024 question paper with all questions from Physics, Chemistry, and Biology".to_string(),
            category: "previous-year".to_string(),
            duration_minutes: 180,
            difficulty: "hard".to_string(),
            questions: vec![
                q(
                    "Which of the following is not a greenhouse gas?",
                    &["CO2", "CH4", "N2", "O3"],
                    "N2",
                ),
                q(
                    "DNA replication occurs in which phase of the cell cycle?",
                    &["G1 phase", "S phase", "G2 phase", "M phase"],
                    "S phase",
                ),
                q(
                    "The site of photosynthesis in plant cells is:",
                    &["Mitochondria", "Chloroplast", "Nucleus", "Ribosome"],
                    "Chloroplast",
                ),
            ],
        },
        NewTest {
            name: "Biology - Cell Biology Test".to_string(),
            description: "Comprehensive test on cell structure, function, and cellular processes".to_string(),
            category: "sectional".to_string(),
            duration_minutes: 50,
            difficulty: "medium".to_string(),
            questions: vec![
                q(
                    "Which organelle is known as the powerhouse of the cell?",
                    &["Nucleus", "Mitochondria", "Chloroplast", "Ribosome"],
                    "Mitochondria",
                ),
                q(
                    "The cell wall in plants is made up of:",
                    &["Cellulose", "Chitin", "Peptidoglycan", "Protein"],
                    "Cellulose",
                ),
                q(
                    "Ribosomes are the site of:",
                    &["Protein synthesis", "Lipid synthesis", "DNA replication", "Photosynthesis"],
                    "Protein synthesis",
                ),
            ],
        },
    ]
}
