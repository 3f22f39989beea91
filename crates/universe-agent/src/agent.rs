//! A single autonomous participant: identity, ledger handle, and decision
//! making.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::SecondsFormat;
use serde::Serialize;
use tracing::{debug, info};
use universe_crypto::KeyPair;
use universe_ledger::{Event, EventStore};
use universe_llm::LlmClient;

use crate::config::AgentConfig;
use crate::error::AgentError;

const AGENT_VERSION: &str = env!("CARGO_PKG_VERSION");

const INITIAL_DESCRIPTION: &str = "Agent initialization in Blockchain Universe";

const CLOSING_QUESTION: &str = "What should be the next event in the Blockchain Universe? \
     Provide a brief description (max 100 characters) for the event.";

/// Length of the public-key prefix used as a short agent id.
const SHORT_ID_LEN: usize = 16;

/// Point-in-time summary of an agent and the ledger it writes to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentStats {
    pub public_key: String,
    pub last_event_hash: Option<String>,
    pub total_events: usize,
    pub known_agents: usize,
}

/// An agent with an in-memory Ed25519 identity.
///
/// Several agents may share one [`EventStore`]; each keeps its own pointer
/// to the last event it authored.
pub struct Agent {
    keys: KeyPair,
    ledger: Arc<EventStore>,
    llm: LlmClient,
    config: AgentConfig,
    last_event: Option<String>,
}

impl Agent {
    /// Creates an agent with a freshly generated key pair.
    ///
    /// # Errors
    ///
    /// Returns `AgentError::KeyGeneration` if the OS entropy source fails.
    pub fn new(
        config: AgentConfig,
        ledger: Arc<EventStore>,
        llm: LlmClient,
    ) -> Result<Self, AgentError> {
        let keys = KeyPair::generate().map_err(AgentError::KeyGeneration)?;
        Ok(Self {
            keys,
            ledger,
            llm,
            config,
            last_event: None,
        })
    }

    pub fn public_key_hex(&self) -> String {
        self.keys.public_key_hex()
    }

    /// Hash of the most recent event this agent added, if any.
    pub fn last_event(&self) -> Option<&str> {
        self.last_event.as_deref()
    }

    pub fn ledger(&self) -> &Arc<EventStore> {
        &self.ledger
    }

    fn short_id(&self) -> String {
        let mut id = self.public_key_hex();
        id.truncate(SHORT_ID_LEN);
        id
    }

    /// Records this agent's `initialization` event and returns its hash.
    ///
    /// # Errors
    ///
    /// Returns `AgentError::Ledger` if the event cannot be signed or is
    /// rejected by the store.
    pub fn create_initial_event(&mut self) -> Result<String, AgentError> {
        let fields = BTreeMap::from([
            ("agent_id".to_string(), self.short_id()),
            ("state".to_string(), "active".to_string()),
            ("version".to_string(), AGENT_VERSION.to_string()),
        ]);
        let hash = self.append("initialization", INITIAL_DESCRIPTION, fields, Vec::new())?;
        info!(hash = %hash, "initial event created");
        Ok(hash)
    }

    /// Asks the model for the next event and records it as a `state_change`
    /// whose sole parent is this agent's previous event.
    ///
    /// Returns the new event's hash.
    ///
    /// # Errors
    ///
    /// - `AgentError::Llm` if the completion request fails.
    /// - `AgentError::EmptyDecision` if the answer is blank.
    /// - `AgentError::Ledger` if the event cannot be signed or stored.
    pub async fn make_decision(&mut self) -> Result<String, AgentError> {
        let prompt = self.build_prompt();
        debug!(prompt_length = prompt.len(), "requesting LLM decision");

        let answer = self.llm.complete(&prompt).await?;
        let decision = answer.trim();
        if decision.is_empty() {
            return Err(AgentError::EmptyDecision);
        }
        info!(decision = %decision, "LLM decision received");

        let fields = BTreeMap::from([
            ("agent_id".to_string(), self.short_id()),
            ("action".to_string(), "llm_decision".to_string()),
        ]);
        let parents = self.last_event.iter().cloned().collect();
        let hash = self.append("state_change", decision, fields, parents)?;
        info!(hash = %hash, description = %decision, "decision event created");
        Ok(hash)
    }

    fn append(
        &mut self,
        kind: &str,
        description: &str,
        fields: BTreeMap<String, String>,
        parents: Vec<String>,
    ) -> Result<String, AgentError> {
        let event = self.ledger.create_event(
            kind,
            description,
            fields,
            parents,
            &self.keys.public_key_bytes(),
            &self.keys.private_key_bytes(),
        )?;
        let hash = self.ledger.add_event(event)?;
        self.last_event = Some(hash.clone());
        Ok(hash)
    }

    /// Renders the ledger state the model sees before each decision.
    pub fn build_prompt(&self) -> String {
        let recent = self.ledger.get_recent_events(self.config.recent_events);
        let agents: BTreeMap<_, _> = self.ledger.get_agents().into_iter().collect();

        let mut prompt = String::from("Current Blockchain Universe state:\n\n");

        prompt.push_str(&format!("Recent events ({}):\n", recent.len()));
        for (i, event) in recent.iter().enumerate() {
            prompt.push_str(&format!(
                "{}. [{}] {} - {}\n",
                i + 1,
                event.payload.kind,
                event.payload.description,
                event.payload.timestamp,
            ));
        }

        prompt.push_str(&format!("\nKnown agents ({}):\n", agents.len()));
        for (key, info) in &agents {
            let short = key.get(..SHORT_ID_LEN).unwrap_or(key);
            prompt.push_str(&format!(
                "- Agent {} (last seen: {})\n",
                short,
                info.last_seen.to_rfc3339_opts(SecondsFormat::Secs, true),
            ));
        }

        if let Some(last) = &self.last_event {
            prompt.push_str(&format!("\nMy last event hash: {last}\n"));
        }

        prompt.push('\n');
        prompt.push_str(CLOSING_QUESTION);
        prompt
    }

    /// Ancestor chain of this agent's last event, bounded by
    /// `max_depth` or `agent.max_event_chain` when `None`.
    pub fn chain_from_last(&self, max_depth: Option<usize>) -> Vec<Event> {
        match &self.last_event {
            Some(hash) => self
                .ledger
                .get_event_chain(hash, max_depth.unwrap_or(self.config.max_event_chain)),
            None => Vec::new(),
        }
    }

    pub fn stats(&self) -> AgentStats {
        AgentStats {
            public_key: self.public_key_hex(),
            last_event_hash: self.last_event.clone(),
            total_events: self.ledger.len(),
            known_agents: self.ledger.agent_count(),
        }
    }
}

impl std::fmt::Debug for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agent")
            .field("public_key", &self.public_key_hex())
            .field("last_event", &self.last_event)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
