//! Event, payload, and agent record types.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use universe_crypto::{hash_payload, CryptoError, KeyPair};

use crate::error::LedgerError;

/// Timestamp format stamped into every payload: UTC with fixed microsecond
/// precision, e.g. `2025-03-01T12:00:00.000000Z`. Fixed width keeps the
/// textual form lexically ordered.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";

/// Decodes `null` as the type's default, for producers that encode empty
/// collections as `null`.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// The signed content of an event.
///
/// Field order is part of the hash: the canonical form is the JSON
/// serialisation of this struct, with `fields` keys in sorted order. An
/// empty `fields` map always hashes as `{}`, so a payload signed over
/// `"payload":null` fails verification even though it decodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventPayload {
    /// Free-form kind tag, e.g. `initialization` or `state_change`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Human-readable description.
    pub description: String,
    /// String key/value attributes. A `null` on the wire decodes as empty.
    #[serde(rename = "payload", default, deserialize_with = "null_as_default")]
    pub fields: BTreeMap<String, String>,
    /// Creation time in [`TIMESTAMP_FORMAT`].
    pub timestamp: String,
}

impl EventPayload {
    /// Builds a payload stamped with the current UTC time.
    pub fn now(
        kind: impl Into<String>,
        description: impl Into<String>,
        fields: BTreeMap<String, String>,
    ) -> Self {
        Self {
            kind: kind.into(),
            description: description.into(),
            fields,
            timestamp: Utc::now().format(TIMESTAMP_FORMAT).to_string(),
        }
    }

    /// Computes the payload's hash identifier (lowercase hex SHA3-512).
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::Canonicalization` if serialisation fails.
    pub fn hash(&self) -> Result<String, CryptoError> {
        hash_payload(self)
    }

    /// Parses the creation timestamp. Returns `None` for timestamps that are
    /// not valid RFC 3339, which can only come from foreign producers.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.timestamp)
            .ok()
            .map(|t| t.with_timezone(&Utc))
    }
}

/// A signed ledger event, immutable once signed.
///
/// Serialises to the wire format
/// `{"data": {...}, "parents": [...], "signature": "...", "author_pubkey": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// The signed content.
    #[serde(rename = "data")]
    pub payload: EventPayload,
    /// Hash identifiers of causally preceding events, in order. A `null` on
    /// the wire decodes as empty.
    #[serde(default, deserialize_with = "null_as_default")]
    pub parents: Vec<String>,
    /// Hex-encoded Ed25519 signature over the hex payload hash.
    pub signature: String,
    /// Hex-encoded Ed25519 public key of the author.
    #[serde(rename = "author_pubkey")]
    pub author_key: String,
}

impl Event {
    /// Signs `payload` and assembles an event.
    ///
    /// `private_key` is the 64-byte key pair encoding; `public_key` must be
    /// its public half.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Signing` if the private key is malformed, does
    /// not match `public_key`, or the payload cannot be hashed.
    pub fn signed(
        payload: EventPayload,
        parents: Vec<String>,
        public_key: &[u8],
        private_key: &[u8],
    ) -> Result<Self, LedgerError> {
        let keys = KeyPair::from_private_key_bytes(private_key).map_err(LedgerError::Signing)?;
        if keys.public_key_bytes().as_slice() != public_key {
            return Err(LedgerError::Signing(CryptoError::KeyMismatch));
        }

        let hash = payload.hash().map_err(LedgerError::Signing)?;
        let signature = keys.sign(&hash);

        Ok(Self {
            payload,
            parents,
            signature,
            author_key: keys.public_key_hex(),
        })
    }

    /// Returns the event's hash identifier, derived from the payload alone.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::Canonicalization` if serialisation fails.
    pub fn hash(&self) -> Result<String, CryptoError> {
        self.payload.hash()
    }
}

/// Registry entry for a signing key that has had at least one event
/// accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentInfo {
    /// Hex-encoded public key, also the registry key.
    pub pub_key: String,
    /// Hash of the most recently accepted event from this key.
    pub last_event_hash: String,
    /// Wall-clock time of that acceptance.
    pub last_seen: DateTime<Utc>,
}
