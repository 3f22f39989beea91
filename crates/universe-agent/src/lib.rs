//! The Blockchain Universe agent.
//!
//! An agent owns an in-memory Ed25519 identity, shares an
//! [`EventStore`](universe_ledger::EventStore) with any other agents in the
//! process, and on every tick of its decision loop asks a language model
//! what should happen next, recording the answer as a signed `state_change`
//! event linked to its previous event.

pub mod agent;
pub mod config;
pub mod error;
pub mod runner;

pub use agent::{Agent, AgentStats};
pub use config::{load_config, Config, ConfigError};
pub use error::AgentError;
pub use runner::{run_decision_loop, Decide, DecisionLoopReport};
