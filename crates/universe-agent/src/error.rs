//! Error types for agent operations.

use universe_crypto::CryptoError;
use universe_ledger::LedgerError;
use universe_llm::LlmError;

/// Errors that can occur while creating an agent or running a decision.
///
/// Everything except `KeyGeneration` is recoverable: the decision loop
/// logs the error and tries again on its next tick.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// The agent's key pair could not be generated.
    #[error("failed to generate key pair: {0}")]
    KeyGeneration(#[source] CryptoError),

    /// Creating or adding an event failed.
    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// The completion request failed.
    #[error("failed to get LLM decision: {0}")]
    Llm(#[from] LlmError),

    /// The model answered with nothing but whitespace.
    #[error("LLM returned an empty decision")]
    EmptyDecision,
}
