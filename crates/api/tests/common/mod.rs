//! Common test utilities for integration tests.
//!
//! Builds the full router over the in-memory store backend so tests can
//! drive real HTTP requests without external services.

// Allow dead code in this module - these are helper utilities that may not
// be used by every integration test file.
#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use earlybird_api::app::create_app;
use earlybird_api::config::{
    Config, LogFormat, LoggingConfig, SecurityConfig, ServerConfig, StoreConfig,
};
use store::MemoryKvStore;

pub const API_PREFIX: &str = "/api/v1";

/// Test configuration over the in-memory backend.
pub fn test_config(api_token: &str) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0, // Use random port
            request_timeout_secs: 30,
            path_prefix: API_PREFIX.to_string(),
        },
        store: StoreConfig {
            backend: "memory".to_string(),
            url: String::new(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout_secs: 10,
            idle_timeout_secs: 600,
        },
        logging: LoggingConfig {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        },
        security: SecurityConfig {
            cors_origins: Vec::new(),
            api_token: api_token.to_string(),
        },
    }
}

/// Builds the app plus a handle on its backing store for direct seeding.
pub fn test_app_with_store(api_token: &str) -> (Router, Arc<MemoryKvStore>) {
    let kv = Arc::new(MemoryKvStore::new());
    let app = create_app(test_config(api_token), kv.clone());
    (app, kv)
}

/// Builds the app with no bearer token configured.
pub fn test_app() -> Router {
    test_app_with_store("").0
}

/// Minimal valid registration body.
pub fn register_body(full_name: &str, email: &str, city: &str, status: &str) -> Value {
    json!({
        "fullName": full_name,
        "email": email,
        "city": city,
        "currentStatus": status,
    })
}

pub async fn post_json(
    app: &Router,
    path: &str,
    token: Option<&str>,
    body: &Value,
) -> Response<Body> {
    let mut request = Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    app.clone()
        .oneshot(request.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap()
}

pub async fn get(app: &Router, path: &str, token: Option<&str>) -> Response<Body> {
    let mut request = Request::builder().method("GET").uri(path);
    if let Some(token) = token {
        request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    app.clone()
        .oneshot(request.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

/// Collects a response body as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
