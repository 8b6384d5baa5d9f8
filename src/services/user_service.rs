use sqlx::PgPool;

use crate::auth::password;
use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::user::{User, UserPublic};
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum UserError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Database manager error: {0}")]
    Manager(#[from] DatabaseError),
    #[error("Password hashing error: {0}")]
    Hash(#[from] bcrypt::BcryptError),
    #[error("User already exists")]
    EmailTaken,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("User not found")]
    NotFound,
}

pub struct UserService {
    pool: PgPool,
}

impl UserService {
    pub async fn new() -> Result<Self, UserError> {
        let pool = DatabaseManager::app_pool().await?;
        Ok(Self { pool })
    }

    /// Create a student account. Registration never mints admins; those are
    /// created by the seed command.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<User, UserError> {
        let email = email.trim().to_lowercase();

        if self.email_exists(&email).await? {
            return Err(UserError::EmailTaken);
        }

        let password_hash = password::hash_password(password)?;

        let result = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password_hash, role)
            VALUES ($1, $2, $3, 'student')
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(&email)
        .bind(&password_hash)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(user) => Ok(user),
            // Lost the race against a concurrent registration for the same email
            Err(sqlx::Error::Database(db_err)) if db_err.code().as_deref() == Some("23505") => {
                Err(UserError::EmailTaken)
            }
            Err(other) => Err(other.into()),
        }
    }

    /// Validate credentials and return the user. Unknown email and wrong
    /// password fail identically so the endpoint does not leak which it was.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User, UserError> {
        let email = email.trim().to_lowercase();

        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(&email)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(UserError::InvalidCredentials)?;

        if !password::verify_password(password, &user.password_hash)? {
            return Err(UserError::InvalidCredentials);
        }

        Ok(user)
    }

    pub async fn get(&self, user_id: Uuid) -> Result<User, UserError> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(UserError::NotFound)
    }

    /// Role as currently stored, for re-checking claims against the database.
    pub async fn fetch_role(&self, user_id: Uuid) -> Result<String, UserError> {
        let row: Option<(String,)> = sqlx::query_as("SELECT role FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|(role,)| role).ok_or(UserError::NotFound)
    }

    pub async fn list_public(&self) -> Result<Vec<UserPublic>, UserError> {
        let users = sqlx::query_as::<_, UserPublic>(
            r#"
            SELECT id, name, email, role, subscription_status, created_at
            FROM users
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn email_exists(&self, email: &str) -> Result<bool, UserError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE email = $1")
            .bind(email)
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0 > 0)
    }
}
