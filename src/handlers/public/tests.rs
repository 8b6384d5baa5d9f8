use axum::extract::{Path, Query};
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::cache;
use crate::database::models::test::TestView;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::TestService;

pub const TESTS_CACHE_PREFIX: &str = "tests:";

#[derive(Debug, Deserialize)]
pub struct TestListQuery {
    pub category: Option<String>,
}

/// GET /api/tests?category=... - List tests, answer keys stripped
///
/// Listings are cached per category with the configured TTL; the admin
/// create handler invalidates the whole `tests:` key family.
pub async fn list_tests(Query(query): Query<TestListQuery>) -> ApiResult<Value> {
    let cache_key = match query.category.as_deref() {
        Some(category) => format!("{}{}", TESTS_CACHE_PREFIX, category),
        None => format!("{}all", TESTS_CACHE_PREFIX),
    };

    if cache::enabled() {
        if let Some(cached) = cache::cache().get(&cache_key) {
            return Ok(ApiResponse::success(cached));
        }
    }

    let service = TestService::new().await?;
    let tests = service.list_tests(query.category.as_deref()).await?;
    let views: Vec<TestView> = tests.into_iter().map(TestView::from).collect();

    let value = serde_json::to_value(views).map_err(|e| {
        tracing::error!("failed to serialize tests: {}", e);
        ApiError::internal_server_error("Failed to format response")
    })?;

    if cache::enabled() {
        cache::cache().put(cache_key, value.clone());
    }

    Ok(ApiResponse::success(value))
}

/// GET /api/tests/:id - Fetch a single test, answer key stripped
pub async fn get_test(Path(test_id): Path<Uuid>) -> ApiResult<TestView> {
    let service = TestService::new().await?;
    let test = service.get_test(test_id).await?;
    Ok(ApiResponse::success(TestView::from(test)))
}
