//! Server configuration

use std::time::Duration;

/// Server configuration loaded from environment variables
pub struct Config {
    pub bind_address: String,
    /// Credential for the completion API. `None` disables report generation;
    /// the value itself must never be logged or serialized.
    pub openrouter_api_key: Option<String>,
    pub openrouter_base_url: String,
    pub model: String,
    pub cors_origins: Vec<String>,
    pub request_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            bind_address: std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8080".into()),
            openrouter_api_key: std::env::var("OPENROUTER_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
            openrouter_base_url: std::env::var("OPENROUTER_BASE_URL")
                .unwrap_or_else(|_| "https://openrouter.ai/api/v1".into()),
            model: std::env::var("OPENROUTER_MODEL")
                .unwrap_or_else(|_| "mistralai/mistral-7b-instruct:free".into()),
            cors_origins: std::env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "*".into())
                .split(',')
                .map(|origin| origin.trim().to_string())
                .filter(|origin| !origin.is_empty())
                .collect(),
            request_timeout: Duration::from_secs(
                std::env::var("REQUEST_TIMEOUT_SECS")
                    .ok()
                    .and_then(|secs| secs.parse().ok())
                    .unwrap_or(30),
            ),
        }
    }
}
