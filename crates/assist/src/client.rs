// Relay client for generated table content
//
// Sends a chat-completion request to the generation relay and parses the
// structured reply. Blocking; call it off any latency-sensitive thread.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use taskgrid_config::RelayConfig;
use taskgrid_engine::generation::{GenerationRequest, GenerationSuggestion, Generator};

use crate::prompt::{build_system_prompt, build_user_prompt, parse_suggestion};

/// Error from the generation relay
#[derive(Debug, Clone)]
pub enum AssistError {
    /// Relay endpoint or model missing from settings
    NotConfigured(String),
    /// Network error
    NetworkError(String),
    /// API error response
    ApiError { status: u16, message: String },
    /// Failed to parse response
    ParseError(String),
    /// Relay returned unexpected format
    InvalidResponse(String),
}

impl std::fmt::Display for AssistError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssistError::NotConfigured(msg) => write!(f, "Generation not configured: {}", msg),
            AssistError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            AssistError::ApiError { status, message } => write!(f, "API error ({}): {}", status, message),
            AssistError::ParseError(msg) => write!(f, "Failed to parse response: {}", msg),
            AssistError::InvalidResponse(msg) => write!(f, "Invalid response: {}", msg),
        }
    }
}

impl std::error::Error for AssistError {}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Serialize)]
pub(crate) struct RelayRequest {
    model: String,
    messages: Vec<RelayMessage>,
    system: String,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct RelayMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct RelayResponse {
    #[serde(default)]
    choices: Vec<RelayChoice>,
    /// Some relays forward the upstream content-block shape unchanged.
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct RelayChoice {
    message: RelayResponseMessage,
}

#[derive(Deserialize)]
struct RelayResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
struct RelayError {
    error: RelayErrorDetail,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RelayErrorDetail {
    Detailed { message: String },
    Plain(String),
}

impl RelayErrorDetail {
    fn into_message(self) -> String {
        match self {
            RelayErrorDetail::Detailed { message } => message,
            RelayErrorDetail::Plain(message) => message,
        }
    }
}

// ============================================================================
// Client
// ============================================================================

/// Blocking client for the generation relay.
#[derive(Clone)]
pub struct RelayClient {
    http: reqwest::blocking::Client,
    config: RelayConfig,
}

impl RelayClient {
    pub fn new(config: RelayConfig) -> Result<Self, AssistError> {
        if !config.is_configured() {
            return Err(AssistError::NotConfigured(
                "set generation.endpoint and generation.model in settings.json".to_string(),
            ));
        }
        let http = reqwest::blocking::Client::builder()
            .user_agent(format!("taskgrid/{}", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()
            .map_err(|e| AssistError::NetworkError(e.to_string()))?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    pub(crate) fn build_request(&self, request: &GenerationRequest) -> RelayRequest {
        RelayRequest {
            model: self.config.model.clone(),
            messages: vec![RelayMessage {
                role: "user".to_string(),
                content: build_user_prompt(request),
            }],
            system: build_system_prompt(),
            max_tokens: self.config.max_tokens,
        }
    }

    /// Send one request and return the reply text.
    fn complete(&self, body: &RelayRequest) -> Result<String, AssistError> {
        let mut req = self
            .http
            .post(&self.config.endpoint)
            .header("Content-Type", "application/json")
            .json(body);
        if let Some(key) = &self.config.api_key {
            req = req.header("Authorization", format!("Bearer {}", key));
        }

        let response = req
            .send()
            .map_err(|e| AssistError::NetworkError(e.to_string()))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().unwrap_or_default();
            let message = match serde_json::from_str::<RelayError>(&error_text) {
                Ok(error) => error.error.into_message(),
                Err(_) => error_text,
            };
            return Err(AssistError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let response_body: RelayResponse = response
            .json()
            .map_err(|e| AssistError::ParseError(e.to_string()))?;

        response_body
            .choices
            .into_iter()
            .find_map(|c| c.message.content)
            .or_else(|| response_body.content.into_iter().find_map(|b| b.text))
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| AssistError::InvalidResponse("No content in response".to_string()))
    }
}

impl Generator for RelayClient {
    type Error = AssistError;

    fn generate(&self, request: &GenerationRequest) -> Result<GenerationSuggestion, AssistError> {
        let body = self.build_request(request);
        let content = self.complete(&body).inspect_err(|e| {
            log::warn!("generation relay request failed: {}", e);
        })?;

        let parsed = parse_suggestion(&content)?;
        for warning in &parsed.warnings {
            log::warn!("generation relay: {}", warning);
        }
        Ok(parsed.suggestion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskgrid_config::KeySource;

    fn config() -> RelayConfig {
        RelayConfig {
            endpoint: "http://relay.local/v1/chat/completions".to_string(),
            model: "test-model".to_string(),
            max_tokens: 512,
            timeout_secs: 5,
            api_key: None,
            key_source: KeySource::None,
        }
    }

    #[test]
    fn test_request_shape() {
        let client = RelayClient::new(config()).unwrap();
        let body = client.build_request(&GenerationRequest {
            prompt: "launch".to_string(),
            column_titles: vec!["Task Name".to_string()],
        });
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["model"], "test-model");
        assert_eq!(json["max_tokens"], 512);
        assert_eq!(json["messages"][0]["role"], "user");
        assert!(json["messages"][0]["content"].as_str().unwrap().contains("- Task Name"));
        assert!(json["system"].as_str().unwrap().contains("\"columns\""));
    }

    #[test]
    fn test_unconfigured_relay_is_rejected() {
        let err = RelayClient::new(config().with_endpoint("")).err().unwrap();
        assert!(matches!(err, AssistError::NotConfigured(_)));
    }

    #[test]
    fn test_error_display() {
        let err = AssistError::ApiError {
            status: 429,
            message: "slow down".to_string(),
        };
        assert_eq!(err.to_string(), "API error (429): slow down");
    }
}
