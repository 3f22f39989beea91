//! Per-author bookkeeping maintained as a side effect of accepting events.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::event::AgentInfo;

/// Tracks, per author public key, the latest accepted event and when it was
/// accepted. Entries are created on an author's first accepted event,
/// overwritten on each later one, and never removed.
#[derive(Debug, Default)]
pub(crate) struct AgentRegistry {
    agents: HashMap<String, AgentInfo>,
}

impl AgentRegistry {
    /// Records that `hash` from `pub_key` was accepted at `seen`.
    pub(crate) fn record(&mut self, pub_key: &str, hash: &str, seen: DateTime<Utc>) {
        self.agents.insert(
            pub_key.to_string(),
            AgentInfo {
                pub_key: pub_key.to_string(),
                last_event_hash: hash.to_string(),
                last_seen: seen,
            },
        );
    }

    /// Returns an independent copy of every entry.
    pub(crate) fn snapshot(&self) -> HashMap<String, AgentInfo> {
        self.agents.clone()
    }

    pub(crate) fn len(&self) -> usize {
        self.agents.len()
    }
}
