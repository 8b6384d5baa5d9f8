use axum::{extract::Request, middleware::Next, response::Response};

use crate::error::ApiError;
use crate::services::UserService;

use super::auth::AuthUser;

/// Middleware gating the admin surface. Runs after JWT auth and re-checks
/// the role against the users table, so a stale token minted before a
/// demotion stops working immediately.
pub async fn require_admin_middleware(
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_user = request
        .extensions()
        .get::<AuthUser>()
        .ok_or_else(|| ApiError::unauthorized("Authentication required"))?
        .clone();

    if !auth_user.is_admin() {
        return Err(ApiError::forbidden("Admin access required"));
    }

    let service = UserService::new().await?;
    let stored_role = match service.fetch_role(auth_user.user_id).await {
        Ok(role) => role,
        Err(crate::services::user_service::UserError::NotFound) => {
            tracing::warn!(user_id = %auth_user.user_id, "token references a deleted user");
            return Err(ApiError::forbidden("Admin access required"));
        }
        Err(e) => return Err(e.into()),
    };

    if stored_role != "admin" {
        tracing::warn!(
            user_id = %auth_user.user_id,
            "token claims admin but stored role is '{}'",
            stored_role
        );
        return Err(ApiError::forbidden("Admin access required"));
    }

    Ok(next.run(request).await)
}
