//! OpenRouter client for the chat completions API

use std::time::Duration;

use radreport_core::ReportError;
use serde::{Deserialize, Serialize};

/// Client for the OpenRouter chat completions API
#[derive(Clone)]
pub struct OpenRouterClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

/// A chat message in the conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

/// Request body for the chat completions API
#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

/// Response from the chat completions API.
///
/// `choices` defaults to empty so a response missing the key entirely is
/// handled the same way as an explicit empty list.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: String,
}

/// Error detail from the chat completions API
#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

impl OpenRouterClient {
    /// Create a new client with the given credential and endpoint settings
    pub fn new(api_key: String, base_url: String, model: String, timeout: Duration) -> Self {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            http,
            api_key,
            base_url,
            model,
        }
    }

    /// Send a system prompt and user message, return the first choice's text
    pub async fn chat(&self, system: &str, user_message: &str) -> Result<String, ReportError> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user_message.to_string(),
                },
            ],
        };

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ReportError::Upstream(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            if let Ok(api_err) = serde_json::from_str::<ApiError>(&body) {
                return Err(ReportError::Upstream(format!(
                    "({}) {}",
                    status, api_err.error.message
                )));
            }
            return Err(ReportError::Upstream(format!("({}) {}", status, body)));
        }

        let completion = response
            .json::<ChatResponse>()
            .await
            .map_err(|e| ReportError::Upstream(format!("Failed to parse response: {}", e)))?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or(ReportError::EmptyCompletion)
    }
}
