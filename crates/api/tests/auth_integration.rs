//! Integration tests for the shared bearer token and health endpoint.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, post_json, register_body, test_app_with_store, API_PREFIX};

#[tokio::test]
async fn test_health_is_public() {
    let (app, _) = test_app_with_store("sekrit");

    let response = get(&app, &format!("{API_PREFIX}/health"), None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_business_routes_require_token_when_configured() {
    let (app, _) = test_app_with_store("sekrit");

    let response = get(&app, &format!("{API_PREFIX}/leaderboard"), None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = get(&app, &format!("{API_PREFIX}/leaderboard"), Some("wrong")).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = get(&app, &format!("{API_PREFIX}/leaderboard"), Some("sekrit")).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_register_accepts_valid_token() {
    let (app, _) = test_app_with_store("sekrit");

    let response = post_json(
        &app,
        &format!("{API_PREFIX}/register"),
        Some("sekrit"),
        &register_body("Asha Rao", "asha@x.com", "Pune", "Student"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_register_rejects_missing_token() {
    let (app, _) = test_app_with_store("sekrit");

    let response = post_json(
        &app,
        &format!("{API_PREFIX}/register"),
        None,
        &register_body("Asha Rao", "asha@x.com", "Pune", "Student"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_empty_token_disables_the_check() {
    let (app, _) = test_app_with_store("");

    let response = get(&app, &format!("{API_PREFIX}/leaderboard"), None).await;
    assert_eq!(response.status(), StatusCode::OK);
}
