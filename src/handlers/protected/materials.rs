use axum::{extract::Path, Extension};
use uuid::Uuid;

use crate::database::models::material::DownloadGrant;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::CatalogService;

/// POST /api/materials/:id/download - Request download access
///
/// Free materials are open to any signed-in user; paid ones require a
/// completed purchase (403 otherwise). Each grant bumps the download
/// counter and is recorded in the download history.
pub async fn download(
    Extension(auth_user): Extension<AuthUser>,
    Path(material_id): Path<Uuid>,
) -> ApiResult<DownloadGrant> {
    let service = CatalogService::new().await?;
    let grant = service.record_download(auth_user.user_id, material_id).await?;

    tracing::debug!(
        user_id = %auth_user.user_id,
        material_id = %material_id,
        downloads = grant.downloads,
        "download granted"
    );

    Ok(ApiResponse::success(grant))
}
