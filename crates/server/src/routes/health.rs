//! Health check endpoint

use axum::{Extension, Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;

use crate::ai::OpenRouterClient;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
}

/// GET /health - Report whether the service can generate reports
///
/// Healthy means a completion API credential is configured. The upstream is
/// not probed, so health checks never spend a completion call.
pub async fn check(Extension(client): Extension<Option<OpenRouterClient>>) -> impl IntoResponse {
    match client {
        Some(_) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "healthy".to_string(),
                reason: None,
            }),
        ),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthResponse {
                status: "unhealthy".to_string(),
                reason: Some("OPENROUTER_API_KEY not configured".to_string()),
            }),
        ),
    }
}
