use crate::database::models::user::UserPublic;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::UserService;

/// GET /api/admin/users - List all users
///
/// Password hashes never appear here; the query selects the public
/// projection only.
pub async fn list() -> ApiResult<Vec<UserPublic>> {
    let service = UserService::new().await?;
    let users = service.list_public().await?;
    Ok(ApiResponse::success(users))
}
