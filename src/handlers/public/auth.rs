use axum::Json;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::auth::{generate_jwt, Claims};
use crate::config;
use crate::database::models::user::UserPublic;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::UserService;

const MIN_PASSWORD_LENGTH: usize = 8;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: UserPublic,
    pub token: String,
    pub expires_in: u64,
}

/// POST /auth/register - Create a student account and issue a JWT
///
/// Expected input:
/// ```json
/// { "name": "string", "email": "string", "password": "string" }
/// ```
///
/// Returns `{ user, token, expires_in }`. Duplicate emails are a 409.
/// The role is always `student`; admin accounts come from the seed command.
pub async fn register(Json(payload): Json<RegisterRequest>) -> ApiResult<AuthResponse> {
    validate_registration(&payload)?;

    let service = UserService::new().await?;
    let user = service
        .register(payload.name.trim(), &payload.email, &payload.password)
        .await?;

    tracing::info!(user_id = %user.id, "registered new user");

    Ok(ApiResponse::created(issue_token(user.into())?))
}

/// POST /auth/login - Authenticate and receive a JWT
///
/// Expected input:
/// ```json
/// { "email": "string", "password": "string" }
/// ```
///
/// Unknown email and wrong password both return the same 401.
pub async fn login(Json(payload): Json<LoginRequest>) -> ApiResult<AuthResponse> {
    if payload.email.trim().is_empty() || payload.password.is_empty() {
        return Err(ApiError::bad_request("Email and password are required"));
    }

    let service = UserService::new().await?;
    let user = service.authenticate(&payload.email, &payload.password).await?;

    tracing::debug!(user_id = %user.id, "user logged in");

    Ok(ApiResponse::success(issue_token(user.into())?))
}

fn issue_token(user: UserPublic) -> Result<AuthResponse, ApiError> {
    let security = &config::config().security;
    let claims = Claims::new(
        user.id,
        user.email.clone(),
        user.role.clone(),
        security.jwt_expiry_hours,
    );
    let token = generate_jwt(&claims, &security.jwt_secret)?;

    Ok(AuthResponse {
        user,
        token,
        expires_in: security.jwt_expiry_hours * 3600,
    })
}

fn validate_registration(payload: &RegisterRequest) -> Result<(), ApiError> {
    let mut field_errors = HashMap::new();

    if payload.name.trim().is_empty() {
        field_errors.insert("name".to_string(), "Name is required".to_string());
    }
    if let Err(msg) = validate_email_format(payload.email.trim()) {
        field_errors.insert("email".to_string(), msg);
    }
    if payload.password.len() < MIN_PASSWORD_LENGTH {
        field_errors.insert(
            "password".to_string(),
            format!("Password must be at least {} characters", MIN_PASSWORD_LENGTH),
        );
    }

    if field_errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::validation_error("Invalid registration input", Some(field_errors)))
    }
}

fn validate_email_format(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email cannot be empty".to_string());
    }

    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 || parts[0].is_empty() || !parts[1].contains('.') {
        return Err("Invalid email format".to_string());
    }

    Ok(())
}
