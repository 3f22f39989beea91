//! Content-addressed event ledger for the Blockchain Universe.
//!
//! The ledger is an in-memory directed acyclic graph of signed events. Each
//! event carries a payload (kind, description, string map, UTC timestamp),
//! an ordered list of causal parent hashes, the author's Ed25519 public key,
//! and a signature over the hex-encoded SHA3-512 digest of the payload.
//!
//! # Identity
//!
//! An event's hash identifier covers the payload only. Two events with the
//! same payload but different parents or authors share an identifier, and
//! the one accepted later replaces the earlier one in storage.
//!
//! # Concurrency
//!
//! [`EventStore`] guards its event map and agent registry with a single
//! reader/writer lock. [`EventStore::add_event`] verifies and inserts under
//! the write lock; every query runs under the read lock and returns owned
//! copies. [`EventStore::create_event`] touches no shared state.
//!
//! # Usage
//!
//! ```rust,ignore
//! use universe_crypto::KeyPair;
//! use universe_ledger::EventStore;
//!
//! let store = EventStore::new();
//! let keys = KeyPair::generate()?;
//! let event = store.create_event(
//!     "init",
//!     "genesis",
//!     Default::default(),
//!     vec![],
//!     &keys.public_key_bytes(),
//!     &keys.private_key_bytes(),
//! )?;
//! let hash = store.add_event(event)?;
//! let chain = store.get_event_chain(&hash, 10);
//! ```

mod chain;
mod error;
mod event;
mod registry;
mod store;

pub use error::LedgerError;
pub use event::{AgentInfo, Event, EventPayload, TIMESTAMP_FORMAT};
pub use store::{EventStore, ParentPolicy};
