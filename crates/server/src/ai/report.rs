//! Radiology report generation from free-text findings

use radreport_core::{ReportError, ReportResponse, extract_report};

use super::client::OpenRouterClient;

const SYSTEM_PROMPT: &str = r#"You are an AI-powered radiology assistant. Turn imaging findings into a structured report.

The report MUST be a JSON object with this structure:
{
  "differential_diagnosis": "possible conditions related to the findings",
  "concise_impression": "a short summary of the key findings"
}

Return ONLY the JSON object, no other text."#;

/// Generate a structured report for the given findings.
///
/// The upstream call can fail; extraction cannot. Fields the model did not
/// produce in a recognizable form degrade to placeholder text, so a
/// successful completion always yields a full report.
pub async fn generate(
    client: &OpenRouterClient,
    findings: &str,
) -> Result<ReportResponse, ReportError> {
    let user_message = format!("Findings: {}", findings);

    let completion = client.chat(SYSTEM_PROMPT, &user_message).await?;

    tracing::debug!(completion_len = completion.len(), "Extracting report fields");

    Ok(extract_report(&completion))
}
