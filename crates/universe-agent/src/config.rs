//! Agent configuration loading from file and environment variables.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use universe_ledger::ParentPolicy;
use universe_llm::LlmConfig;

/// Top-level agent configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Decision loop settings.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Completion endpoint settings.
    #[serde(default)]
    pub llm: LlmConfig,

    /// Event ledger settings.
    #[serde(default)]
    pub ledger: LedgerConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Decision loop configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Seconds between decisions.
    #[serde(default = "default_decision_interval_secs")]
    pub decision_interval_secs: u64,

    /// Maximum depth when walking the agent's own ancestor chain.
    #[serde(default = "default_max_event_chain")]
    pub max_event_chain: usize,

    /// Number of recent events included in each prompt.
    #[serde(default = "default_recent_events")]
    pub recent_events: usize,
}

/// Event ledger configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Whether events naming unknown parents are accepted.
    #[serde(default)]
    pub parent_policy: ParentPolicy,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "universe_ledger=debug,info").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to output logs in JSON format.
    #[serde(default)]
    pub json: bool,
}

fn default_decision_interval_secs() -> u64 {
    30
}

fn default_max_event_chain() -> usize {
    100
}

fn default_recent_events() -> usize {
    5
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            decision_interval_secs: default_decision_interval_secs(),
            max_event_chain: default_max_event_chain(),
            recent_events: default_recent_events(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl AgentConfig {
    pub fn decision_interval(&self) -> Duration {
        Duration::from_secs(self.decision_interval_secs)
    }
}

impl Config {
    /// Checks required fields and value ranges.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.agent.decision_interval_secs < 1 {
            return Err(ConfigError::Invalid(
                "agent.decision_interval_secs must be at least 1".to_string(),
            ));
        }
        if self.agent.max_event_chain < 1 {
            return Err(ConfigError::Invalid(
                "agent.max_event_chain must be at least 1".to_string(),
            ));
        }
        self.llm
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse the configuration file.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// The configuration parsed but failed validation.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Loads configuration from a TOML file, falling back to defaults, then
/// applies environment overrides and validates the result.
///
/// Environment variable overrides:
/// - `UNIVERSE_LLM_ENDPOINT` overrides `llm.api_endpoint`
/// - `UNIVERSE_LLM_API_KEY` overrides `llm.api_key`
/// - `UNIVERSE_LLM_MODEL` overrides `llm.model`
/// - `UNIVERSE_DECISION_INTERVAL_SECS` overrides `agent.decision_interval_secs`
/// - `UNIVERSE_LOG_LEVEL` overrides `logging.level`
/// - `UNIVERSE_LOG_JSON` overrides `logging.json` (set to "true" to enable)
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read or parsed,
/// or if the final configuration is invalid.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    load_config_with_env(path, |key| std::env::var(key).ok())
}

/// [`load_config`] with an explicit environment lookup.
///
/// # Errors
///
/// See [`load_config`].
pub fn load_config_with_env<F>(path: Option<&str>, env: F) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match path {
        Some(p) => match std::fs::read_to_string(p) {
            Ok(contents) => toml::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = p, "config file not found, using defaults");
                Config::default()
            }
            Err(e) => return Err(ConfigError::FileRead(e)),
        },
        None => Config::default(),
    };

    if let Some(endpoint) = env("UNIVERSE_LLM_ENDPOINT") {
        config.llm.api_endpoint = endpoint;
    }
    if let Some(key) = env("UNIVERSE_LLM_API_KEY") {
        config.llm.api_key = key;
    }
    if let Some(model) = env("UNIVERSE_LLM_MODEL") {
        config.llm.model = model;
    }
    if let Some(interval) = env("UNIVERSE_DECISION_INTERVAL_SECS") {
        if let Ok(parsed) = interval.parse() {
            config.agent.decision_interval_secs = parsed;
        }
    }
    if let Some(level) = env("UNIVERSE_LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Some(json) = env("UNIVERSE_LOG_JSON") {
        config.logging.json = json == "true" || json == "1";
    }

    config.validate()?;
    Ok(config)
}

/// Returns a fully populated example configuration pointing at a local
/// Ollama server.
pub fn example_config() -> Config {
    Config {
        agent: AgentConfig::default(),
        llm: LlmConfig::new("http://localhost:11434/v1/completions"),
        ledger: LedgerConfig::default(),
        logging: LoggingConfig::default(),
    }
}
