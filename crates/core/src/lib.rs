//! radreport-core: Shared report types and completion-text extraction
//!
//! This crate provides the types used across the report server,
//! including the request/response pair, the error taxonomy, and the
//! extraction engine that turns raw model output into a structured report.

pub mod error;
pub mod extract;
pub mod report;

// Re-export our types
pub use error::ReportError;
pub use extract::{DIAGNOSIS_PLACEHOLDER, IMPRESSION_PLACEHOLDER, extract_report};
pub use report::{ReportRequest, ReportResponse};
