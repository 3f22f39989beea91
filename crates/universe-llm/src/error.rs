use thiserror::Error;

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("invalid LLM configuration: {0}")]
    Config(String),

    #[error("LLM request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("LLM API error (status {status}): {body}")]
    Status { status: u16, body: String },

    #[error("failed to decode LLM response: {0}")]
    Decode(#[source] reqwest::Error),

    #[error("LLM API error: {0}")]
    Api(String),

    #[error("no completion choices returned")]
    NoChoices,
}
