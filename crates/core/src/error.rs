use thiserror::Error;

/// Report service error types
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("OpenRouter API error: {0}")]
    Upstream(String),

    #[error("OpenRouter API returned no content")]
    EmptyCompletion,
}

impl ReportError {
    /// Stable label for metrics and logs
    pub fn kind(&self) -> &'static str {
        match self {
            ReportError::Configuration(_) => "configuration",
            ReportError::Upstream(_) => "upstream",
            ReportError::EmptyCompletion => "empty_completion",
        }
    }
}
