use axum::extract::Query;
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::cache;
use crate::database::models::material::Material;
use crate::database::models::subject::Subject;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::catalog_service::CatalogError;
use crate::services::CatalogService;

pub const SUBJECTS_CACHE_KEY: &str = "subjects";

/// GET /api/subjects - List the subject catalog
///
/// Served from the TTL cache when warm. If the database is unreachable the
/// built-in default list is returned instead of an error, so the landing
/// page keeps rendering through an outage. The fallback is never cached.
pub async fn list_subjects() -> ApiResult<Value> {
    if cache::enabled() {
        if let Some(cached) = cache::cache().get(SUBJECTS_CACHE_KEY) {
            return Ok(ApiResponse::success(cached));
        }
    }

    match load_subjects().await {
        Ok(subjects) => {
            let value = to_value(subjects)?;
            if cache::enabled() {
                cache::cache().put(SUBJECTS_CACHE_KEY, value.clone());
            }
            Ok(ApiResponse::success(value))
        }
        Err(e) => {
            tracing::warn!("subject listing failed, serving defaults: {}", e);
            Ok(ApiResponse::success(to_value(Subject::defaults())?))
        }
    }
}

async fn load_subjects() -> Result<Vec<Subject>, CatalogError> {
    let service = CatalogService::new().await?;
    service.list_subjects().await
}

#[derive(Debug, Deserialize)]
pub struct MaterialListQuery {
    pub subject_id: Option<Uuid>,
}

/// GET /api/materials?subject_id=... - List study materials
pub async fn list_materials(
    Query(query): Query<MaterialListQuery>,
) -> ApiResult<Vec<Material>> {
    let service = CatalogService::new().await?;
    let materials = service.list_materials(query.subject_id).await?;
    Ok(ApiResponse::success(materials))
}

fn to_value(subjects: Vec<Subject>) -> Result<Value, ApiError> {
    serde_json::to_value(subjects).map_err(|e| {
        tracing::error!("failed to serialize subjects: {}", e);
        ApiError::internal_server_error("Failed to format response")
    })
}
