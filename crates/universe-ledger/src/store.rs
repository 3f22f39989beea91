//! The event store: verified insertion, lookup, recency listing, and
//! ancestor traversal over a lock-guarded event map and agent registry.

use std::collections::{BTreeMap, HashMap};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use universe_crypto::verify;

use crate::chain;
use crate::error::LedgerError;
use crate::event::{AgentInfo, Event, EventPayload};
use crate::registry::AgentRegistry;

/// What [`EventStore::add_event`] does with parent hashes it has never
/// accepted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParentPolicy {
    /// Accept the event and keep the dangling reference. Traversal skips it.
    #[default]
    AcceptDangling,
    /// Reject the event with [`LedgerError::UnknownParent`].
    RejectDangling,
}

/// An accepted event plus the ordering keys used by
/// [`EventStore::get_recent_events`].
#[derive(Debug)]
struct StoredEvent {
    event: Event,
    created_at: Option<DateTime<Utc>>,
    /// Acceptance order, breaks ties between equal timestamps.
    seq: u64,
}

#[derive(Debug, Default)]
struct LedgerState {
    events: HashMap<String, StoredEvent>,
    agents: AgentRegistry,
    next_seq: u64,
}

/// In-memory store of signed events keyed by payload hash.
///
/// Share it between tasks as `Arc<EventStore>`; all methods take `&self`.
/// Critical sections are short and never await or perform I/O, so a
/// synchronous lock is used.
#[derive(Debug, Default)]
pub struct EventStore {
    state: RwLock<LedgerState>,
    parent_policy: ParentPolicy,
}

impl EventStore {
    /// Creates an empty store that accepts dangling parent references.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store with the given dangling-parent policy.
    pub fn with_parent_policy(parent_policy: ParentPolicy) -> Self {
        Self {
            state: RwLock::default(),
            parent_policy,
        }
    }

    pub fn parent_policy(&self) -> ParentPolicy {
        self.parent_policy
    }

    /// Builds a payload stamped with the current UTC time, signs it, and
    /// returns the event without inserting it.
    ///
    /// Does not read or modify the store.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Signing` if the key material is malformed or
    /// the keys do not belong together.
    pub fn create_event(
        &self,
        kind: &str,
        description: &str,
        fields: BTreeMap<String, String>,
        parents: Vec<String>,
        public_key: &[u8],
        private_key: &[u8],
    ) -> Result<Event, LedgerError> {
        let payload = EventPayload::now(kind, description, fields);
        Event::signed(payload, parents, public_key, private_key)
    }

    /// Verifies `event` and inserts it, returning its hash identifier.
    ///
    /// The hash is recomputed from the payload and the signature checked
    /// against the author key. On success the event is stored under that
    /// hash, replacing any event with an identical payload, and the author's
    /// registry entry is updated. Verification and insertion happen under
    /// one write lock; on failure neither map changes.
    ///
    /// # Errors
    ///
    /// - `LedgerError::Verification` for a malformed key or signature, or a
    ///   signature that does not match the payload.
    /// - `LedgerError::UnknownParent` for a dangling parent under
    ///   [`ParentPolicy::RejectDangling`].
    pub fn add_event(&self, event: Event) -> Result<String, LedgerError> {
        let mut state = self.write();

        let hash = match Self::verify_event(&event) {
            Ok(hash) => hash,
            Err(e) => {
                tracing::warn!(author = %short(&event.author_key), error = %e, "rejected event");
                return Err(e);
            }
        };

        if self.parent_policy == ParentPolicy::RejectDangling {
            if let Some(parent) = event
                .parents
                .iter()
                .find(|p| !state.events.contains_key(p.as_str()))
            {
                tracing::warn!(
                    hash = %short(&hash),
                    parent = %short(parent),
                    "rejected event with unknown parent"
                );
                return Err(LedgerError::UnknownParent {
                    parent: parent.clone(),
                });
            }
        }

        let seq = state.next_seq;
        state.next_seq += 1;
        state.agents.record(&event.author_key, &hash, Utc::now());

        tracing::debug!(
            hash = %short(&hash),
            kind = %event.payload.kind,
            author = %short(&event.author_key),
            "event added"
        );

        let created_at = event.payload.created_at();
        if let Some(previous) = state.events.insert(
            hash.clone(),
            StoredEvent {
                event,
                created_at,
                seq,
            },
        ) {
            tracing::debug!(
                hash = %short(&hash),
                replaced_author = %short(&previous.event.author_key),
                "event replaced existing entry with identical payload"
            );
        }

        Ok(hash)
    }

    /// Returns a copy of the event stored under `hash`, if any.
    pub fn get_event(&self, hash: &str) -> Option<Event> {
        self.read().events.get(hash).map(|stored| stored.event.clone())
    }

    /// Returns `true` if an event is stored under `hash`.
    pub fn contains(&self, hash: &str) -> bool {
        self.read().events.contains_key(hash)
    }

    /// Returns up to `limit` events, most recent creation timestamp first.
    ///
    /// Events with equal timestamps are ordered by acceptance, latest first.
    /// Events whose timestamp cannot be parsed sort after all others.
    pub fn get_recent_events(&self, limit: usize) -> Vec<Event> {
        let state = self.read();
        let mut stored: Vec<&StoredEvent> = state.events.values().collect();
        stored.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.seq.cmp(&a.seq))
        });
        stored
            .into_iter()
            .take(limit)
            .map(|s| s.event.clone())
            .collect()
    }

    /// Returns a snapshot of the agent registry keyed by public key hex.
    pub fn get_agents(&self) -> HashMap<String, AgentInfo> {
        self.read().agents.snapshot()
    }

    /// Returns the ancestor chain of `start_hash`, depth-first, at most
    /// `max_depth` hops deep, with no event repeated.
    ///
    /// The whole traversal runs under one read lock and so observes a single
    /// snapshot of the store.
    pub fn get_event_chain(&self, start_hash: &str, max_depth: usize) -> Vec<Event> {
        let state = self.read();
        chain::walk(start_hash, max_depth, |hash| {
            state.events.get(hash).map(|stored| &stored.event)
        })
    }

    /// Number of stored events.
    pub fn len(&self) -> usize {
        self.read().events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().events.is_empty()
    }

    /// Number of distinct authors with at least one accepted event.
    pub fn agent_count(&self) -> usize {
        self.read().agents.len()
    }

    fn verify_event(event: &Event) -> Result<String, LedgerError> {
        let hash = event.hash().map_err(LedgerError::Verification)?;
        verify(&hash, &event.signature, &event.author_key).map_err(LedgerError::Verification)?;
        Ok(hash)
    }

    // All fallible checks in `add_event` run before the first mutation, so
    // a poisoned lock still guards consistent maps.
    fn read(&self) -> RwLockReadGuard<'_, LedgerState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, LedgerState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Shortens a hex identifier for log output.
fn short(hex: &str) -> &str {
    hex.get(..16).unwrap_or(hex)
}
