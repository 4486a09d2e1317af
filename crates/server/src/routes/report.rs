//! Report generation endpoint

use axum::{Extension, Json};
use radreport_core::{ReportError, ReportRequest, ReportResponse};

use crate::ai::OpenRouterClient;
use crate::error::AppError;
use crate::middleware::RequestId;

/// POST /generate-report - Generate a structured report from findings text
///
/// Sends the findings to the completion API and returns the extracted
/// differential diagnosis and concise impression. Findings are clinical
/// content, so only their length is logged.
pub async fn generate(
    Extension(client): Extension<Option<OpenRouterClient>>,
    Extension(request_id): Extension<RequestId>,
    Json(body): Json<ReportRequest>,
) -> Result<Json<ReportResponse>, AppError> {
    let client = client.ok_or_else(|| {
        ReportError::Configuration("OPENROUTER_API_KEY not configured".to_string())
    })?;

    tracing::info!(
        request_id = %request_id.0,
        findings_len = body.findings.len(),
        "Generating report"
    );

    match crate::ai::report::generate(&client, &body.findings).await {
        Ok(report) => {
            metrics::counter!("report_generations_total", "outcome" => "ok").increment(1);
            Ok(Json(report))
        }
        Err(err) => {
            metrics::counter!("report_generations_total", "outcome" => err.kind()).increment(1);
            Err(err.into())
        }
    }
}
