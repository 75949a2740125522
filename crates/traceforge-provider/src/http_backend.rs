//! Live HTTP backend
//!
//! Chat-completions style JSON POST against a configurable endpoint. The
//! response text is split into non-empty lines; anything else (transport
//! failure, unexpected shape, empty content) is an error the chain will
//! absorb.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use traceforge_config::Config;
use traceforge_utils::error::ProviderError;

use crate::types::GenerationBackend;

/// Default generation endpoint
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Default model requested when the configuration does not name one
const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Live generation backend over HTTP.
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: String,
}

impl HttpBackend {
    /// Create a new live backend.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Misconfiguration` if the HTTP client cannot
    /// be constructed.
    pub fn new(
        api_key: String,
        base_url: Option<String>,
        model: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::Misconfiguration(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            api_key,
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        })
    }

    /// Create a live backend from configuration and an already-resolved
    /// credential.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Misconfiguration` if the HTTP client cannot
    /// be constructed.
    pub fn new_from_config(config: &Config, api_key: String) -> Result<Self, ProviderError> {
        Self::new(
            api_key,
            config.provider.base_url.clone(),
            config.provider.model.clone(),
            Duration::from_secs(config.provider.request_timeout_secs),
        )
    }

    fn build_request(&self, prompt: &str) -> ChatRequest<'_> {
        ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: format!("Generate test cases:\n{prompt}"),
            }],
        }
    }

    /// Split response text into trimmed, non-empty lines.
    fn split_lines(text: &str) -> Vec<String> {
        text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(ToString::to_string)
            .collect()
    }
}

#[async_trait]
impl GenerationBackend for HttpBackend {
    async fn generate(&self, prompt: &str) -> Result<Vec<String>, ProviderError> {
        debug!(model = %self.model, "Invoking live generation backend");

        let request = self.build_request(prompt);
        let response = self
            .client
            .post(&self.base_url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Transport(format!(
                "backend returned HTTP {status}"
            )));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::MalformedResponse(e.to_string()))?;

        let content = body
            .choices
            .first()
            .map(|choice| choice.message.content.as_str())
            .unwrap_or_default();

        let lines = Self::split_lines(content);
        if lines.is_empty() {
            return Err(ProviderError::Empty);
        }

        debug!(line_count = lines.len(), "Live backend produced output");
        Ok(lines)
    }
}
