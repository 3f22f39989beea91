//! Completion client for the Blockchain Universe agent.
//!
//! Forwards a text prompt to an OpenAI-style `/v1/completions` endpoint
//! (Ollama, llama.cpp server, vLLM, ...) together with a fixed system prompt
//! that confines the model to reasoning about ledger events, and returns the
//! first completion choice.
//!
//! The client performs a single attempt per call. Retrying is left to the
//! caller; the agent's decision loop simply tries again on its next tick.

pub mod client;
pub mod config;
pub mod error;
pub mod prompt;

pub use client::LlmClient;
pub use config::LlmConfig;
pub use error::LlmError;
pub use prompt::SYSTEM_PROMPT;
