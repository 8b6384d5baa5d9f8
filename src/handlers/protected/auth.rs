use axum::Extension;

use crate::database::models::user::UserPublic;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::UserService;

/// GET /api/auth/me - Current authenticated user's profile
pub async fn me(Extension(auth_user): Extension<AuthUser>) -> ApiResult<UserPublic> {
    let service = UserService::new().await?;
    let user = service.get(auth_user.user_id).await?;
    Ok(ApiResponse::success(user.into()))
}
