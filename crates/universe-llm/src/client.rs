use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::LlmConfig;
use crate::error::LlmError;
use crate::prompt::{HEALTH_PROMPT, SYSTEM_PROMPT};

const USER_AGENT: &str = concat!("universe-agent/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    max_tokens: u32,
    #[serde(skip_serializing_if = "is_zero")]
    temperature: f64,
    system: &'a str,
}

fn is_zero(value: &f64) -> bool {
    *value == 0.0
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Usage,
    #[serde(default)]
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    text: String,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Usage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
    #[serde(default)]
    total_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
    #[serde(default, rename = "type")]
    kind: Option<String>,
}

/// HTTP client for a completions endpoint.
#[derive(Debug, Clone)]
pub struct LlmClient {
    config: LlmConfig,
    http: reqwest::Client,
}

impl LlmClient {
    /// Builds a client with the configured request timeout.
    ///
    /// # Errors
    ///
    /// Returns `LlmError::Config` if the endpoint is empty, or
    /// `LlmError::Http` if the underlying HTTP client cannot be built.
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        if config.api_endpoint.trim().is_empty() {
            return Err(LlmError::Config("LLM API endpoint is required".to_string()));
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { config, http })
    }

    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    /// Sends `prompt` with the system prompt and returns the first choice's
    /// text, untrimmed.
    ///
    /// # Errors
    ///
    /// - `LlmError::Http` on transport failure or timeout.
    /// - `LlmError::Status` on any status other than 200.
    /// - `LlmError::Decode` if the body is not a completion response.
    /// - `LlmError::Api` if the body carries an `error` object.
    /// - `LlmError::NoChoices` if the response has no choices.
    pub async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let body = CompletionRequest {
            model: &self.config.model,
            prompt,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            system: SYSTEM_PROMPT,
        };

        let mut request = self
            .http
            .post(&self.config.api_endpoint)
            .header(CONTENT_TYPE, "application/json")
            .json(&body);
        if !self.config.api_key.is_empty() {
            request = request.header(AUTHORIZATION, format!("Bearer {}", self.config.api_key));
        }

        debug!(
            endpoint = %self.config.api_endpoint,
            model = %self.config.model,
            prompt_length = prompt.len(),
            "sending LLM request"
        );

        let response = request.send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let result: CompletionResponse = response.json().await.map_err(LlmError::Decode)?;

        if let Some(error) = result.error {
            debug!(kind = ?error.kind, "LLM API returned an error object");
            return Err(LlmError::Api(error.message));
        }

        let choice = result.choices.into_iter().next().ok_or(LlmError::NoChoices)?;

        debug!(
            prompt_tokens = result.usage.prompt_tokens,
            completion_tokens = result.usage.completion_tokens,
            tokens = result.usage.total_tokens,
            finish_reason = ?choice.finish_reason,
            length = choice.text.len(),
            "LLM completion received"
        );

        Ok(choice.text)
    }

    /// Issues a minimal completion to check the endpoint is reachable and
    /// answering.
    ///
    /// # Errors
    ///
    /// Returns whatever error [`Self::complete`] returns.
    pub async fn health(&self) -> Result<(), LlmError> {
        self.complete(HEALTH_PROMPT).await.map(|_| ())
    }
}
