//! Health check endpoint handler.

use axum::Json;
use serde::Serialize;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: String,
}

/// Health check endpoint.
///
/// Always reports ok while the process is serving; store failures surface
/// on the business endpoints instead.
pub async fn health_check() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "ok".to_string(),
    })
}
