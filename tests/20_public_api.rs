mod common;

use anyhow::Result;
use reqwest::StatusCode;

/// The subject listing must keep serving even with no database behind it:
/// the handler falls back to the built-in defaults instead of erroring.
#[tokio::test]
async fn subjects_listing_never_fails() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/api/subjects", server.base_url))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["success"], serde_json::json!(true));
    assert!(body["data"].is_array());
    Ok(())
}

#[tokio::test]
async fn unknown_routes_return_404() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/api/does-not-exist", server.base_url))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}
