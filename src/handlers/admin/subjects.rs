use axum::Json;

use crate::cache;
use crate::database::models::subject::Subject;
use crate::error::ApiError;
use crate::handlers::public::catalog::SUBJECTS_CACHE_KEY;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::catalog_service::NewSubject;
use crate::services::CatalogService;

/// POST /api/admin/subjects - Create a subject
pub async fn create(Json(payload): Json<NewSubject>) -> ApiResult<Subject> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::bad_request("Subject name is required"));
    }

    let service = CatalogService::new().await?;
    let subject = service.create_subject(payload).await?;

    cache::cache().invalidate(SUBJECTS_CACHE_KEY);
    tracing::info!(subject_id = %subject.id, "subject created");

    Ok(ApiResponse::created(subject))
}
