//! Application error handling

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use radreport_core::ReportError;
use serde::Serialize;

/// Error body returned to callers, a single human-readable detail line
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub detail: String,
}

/// Application error wrapping the report error taxonomy
#[derive(Debug)]
pub struct AppError(pub ReportError);

impl From<ReportError> for AppError {
    fn from(err: ReportError) -> Self {
        AppError(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!(kind = self.0.kind(), error = %self.0, "Report generation failed");

        let body = ErrorBody {
            detail: format!("⚠ {}", self.0),
        };

        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}
