use axum::{Extension, Json};
use serde::Deserialize;
use std::collections::HashMap;
use uuid::Uuid;

use crate::database::models::attempt::{AttemptSummary, TestAttempt};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::TestService;

#[derive(Debug, Deserialize)]
pub struct SubmitAttemptRequest {
    pub test_id: Uuid,
    /// Question id -> chosen answer.
    #[serde(default)]
    pub answers: HashMap<Uuid, String>,
    /// Seconds left on the countdown at submission. Zero (the default)
    /// means the timer ran out, which is exactly the auto-submit path.
    #[serde(default)]
    pub time_remaining_secs: i64,
}

/// POST /api/attempts - Submit a test for grading
///
/// Expected input:
/// ```json
/// {
///   "test_id": "uuid",
///   "answers": { "<question id>": "<chosen option>" },
///   "time_remaining_secs": 1200
/// }
/// ```
///
/// Grading happens server-side; the response is the stored attempt with
/// score, correct/total counts, and derived time spent. Manual submission
/// and countdown expiry produce identical attempt records.
pub async fn submit(
    Extension(auth_user): Extension<AuthUser>,
    Json(payload): Json<SubmitAttemptRequest>,
) -> ApiResult<TestAttempt> {
    let service = TestService::new().await?;
    let attempt = service
        .submit_attempt(
            auth_user.user_id,
            payload.test_id,
            payload.answers,
            payload.time_remaining_secs,
        )
        .await?;

    tracing::info!(
        user_id = %auth_user.user_id,
        test_id = %payload.test_id,
        score = attempt.score,
        "test attempt recorded"
    );

    Ok(ApiResponse::created(attempt))
}

/// GET /api/attempts - Caller's attempts, newest first
pub async fn list(Extension(auth_user): Extension<AuthUser>) -> ApiResult<Vec<TestAttempt>> {
    let service = TestService::new().await?;
    let attempts = service.list_attempts(auth_user.user_id).await?;
    Ok(ApiResponse::success(attempts))
}

/// GET /api/attempts/summary - Dashboard quick stats for the caller
pub async fn summary(Extension(auth_user): Extension<AuthUser>) -> ApiResult<AttemptSummary> {
    let service = TestService::new().await?;
    let summary = service.attempt_summary(auth_user.user_id).await?;
    Ok(ApiResponse::success(summary))
}
