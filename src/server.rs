use anyhow::Context;
use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config;
use crate::database::manager::DatabaseManager;
use crate::handlers::{admin, protected, public};
use crate::middleware::{jwt_auth_middleware, require_admin_middleware};

/// Assemble the full application router
pub fn app() -> Router {
    let cfg = config::config();

    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        // Public auth + catalog reads
        .merge(public_routes())
        // Bearer-protected API
        .merge(api_routes())
        // Admin surface
        .merge(admin_routes())
        // Global middleware
        .layer(cors_layer(&cfg.security.cors_origins))
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(cfg.api.max_request_size_bytes))
}

fn public_routes() -> Router {
    Router::new()
        .route("/auth/register", post(public::auth::register))
        .route("/auth/login", post(public::auth::login))
        .route("/api/subjects", get(public::catalog::list_subjects))
        .route("/api/materials", get(public::catalog::list_materials))
        .route("/api/tests", get(public::tests::list_tests))
        .route("/api/tests/:id", get(public::tests::get_test))
}

fn api_routes() -> Router {
    Router::new()
        .route("/api/auth/me", get(protected::auth::me))
        .route(
            "/api/attempts",
            post(protected::attempts::submit).get(protected::attempts::list),
        )
        .route("/api/attempts/summary", get(protected::attempts::summary))
        .route(
            "/api/materials/:id/download",
            post(protected::materials::download),
        )
        .route("/api/payments/orders", post(protected::payments::create_order))
        .route("/api/payments/verify", post(protected::payments::verify))
        .route(
            "/api/payments/my-purchases",
            get(protected::payments::my_purchases),
        )
        .route_layer(from_fn(jwt_auth_middleware))
}

fn admin_routes() -> Router {
    Router::new()
        .route("/api/admin/subjects", post(admin::subjects::create))
        .route("/api/admin/materials", post(admin::materials::create))
        .route("/api/admin/tests", post(admin::tests::create))
        .route("/api/admin/users", get(admin::users::list))
        // Outermost layer runs first: authenticate, then check the role
        .route_layer(from_fn(require_admin_middleware))
        .route_layer(from_fn(jwt_auth_middleware))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Resolve the listen port from STUDYDESK_PORT / PORT, default 3000
pub fn port_from_env() -> u16 {
    std::env::var("STUDYDESK_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000)
}

/// Bind and run the HTTP server until shutdown
pub async fn serve(port: u16) -> anyhow::Result<()> {
    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Studydesk API listening on http://{}", bind_addr);
    axum::serve(listener, app()).await.context("server")?;
    Ok(())
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "success": true,
        "data": {
            "name": "Studydesk API",
            "version": version,
            "description": "Backend API for the Studydesk exam-prep storefront",
            "endpoints": {
                "home": "/ (public)",
                "auth": "/auth/register, /auth/login (public), /api/auth/me (bearer)",
                "subjects": "/api/subjects (public)",
                "materials": "/api/materials (public), /api/materials/:id/download (bearer)",
                "tests": "/api/tests[?category=], /api/tests/:id (public)",
                "attempts": "/api/attempts, /api/attempts/summary (bearer)",
                "payments": "/api/payments/orders, /api/payments/verify, /api/payments/my-purchases (bearer)",
                "admin": "/api/admin/* (bearer, admin role)",
            }
        }
    }))
}

async fn health() -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match DatabaseManager::health_check().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "success": false,
                "error": "database unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string()
                }
            })),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn root_describes_the_service() {
        let response = app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["data"]["name"], json!("Studydesk API"));
        assert!(body["data"]["endpoints"].is_object());
    }

    #[tokio::test]
    async fn protected_routes_reject_missing_tokens() {
        let cases = [
            ("GET", "/api/auth/me"),
            ("GET", "/api/attempts"),
            ("GET", "/api/attempts/summary"),
            ("GET", "/api/payments/my-purchases"),
            ("GET", "/api/admin/users"),
        ];

        for (method, uri) in cases {
            let response = app()
                .oneshot(
                    Request::builder()
                        .method(method)
                        .uri(uri)
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{}", uri);
            let body = body_json(response).await;
            assert_eq!(body["success"], json!(false));
            assert_eq!(body["error"]["code"], json!("UNAUTHORIZED"));
        }
    }

    #[tokio::test]
    async fn garbage_bearer_token_is_rejected() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/api/auth/me")
                    .header("authorization", "Bearer not.a.token")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn non_bearer_auth_scheme_is_rejected() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/api/auth/me")
                    .header("authorization", "Basic dXNlcjpwYXNz")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
