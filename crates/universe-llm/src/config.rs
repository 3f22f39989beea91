use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::LlmError;

fn default_model() -> String {
    "llama3.2".to_string()
}

fn default_max_tokens() -> u32 {
    150
}

fn default_temperature() -> f64 {
    0.7
}

fn default_timeout_seconds() -> u64 {
    30
}

/// Connection and sampling settings for the completion endpoint.
#[derive(Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Full URL of the completions endpoint. Required.
    #[serde(default)]
    pub api_endpoint: String,
    /// Bearer token; omitted from requests when empty.
    #[serde(default, skip_serializing)]
    pub api_key: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Sampling temperature in `[0.0, 2.0]`.
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    /// Whole-request timeout in seconds. Default: 30.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_endpoint: String::new(),
            api_key: String::new(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_endpoint", &self.api_endpoint)
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

impl LlmConfig {
    pub fn new(api_endpoint: impl Into<String>) -> Self {
        Self {
            api_endpoint: api_endpoint.into(),
            ..Self::default()
        }
    }

    /// Checks required fields and value ranges.
    ///
    /// # Errors
    ///
    /// Returns `LlmError::Config` naming the first offending field.
    pub fn validate(&self) -> Result<(), LlmError> {
        if self.api_endpoint.trim().is_empty() {
            return Err(LlmError::Config("llm.api_endpoint is required".to_string()));
        }
        if self.max_tokens < 10 {
            return Err(LlmError::Config(
                "llm.max_tokens must be at least 10".to_string(),
            ));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(LlmError::Config(
                "llm.temperature must be between 0 and 2".to_string(),
            ));
        }
        if self.timeout_seconds == 0 {
            return Err(LlmError::Config(
                "llm.timeout_seconds must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
