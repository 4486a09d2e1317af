use serde::{Deserialize, Serialize};

/// Request body for report generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportRequest {
    /// Free-text imaging findings, e.g. a dictated chest X-ray observation
    pub findings: String,
}

/// Structured report produced from a model completion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportResponse {
    pub differential_diagnosis: String,
    pub concise_impression: String,
}
