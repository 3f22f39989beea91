//! Error types for the event ledger.

use universe_crypto::CryptoError;

/// Errors returned by event creation and insertion.
///
/// None of these leave the store modified: a failed insertion changes
/// neither the event map nor the agent registry.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// The event could not be hashed or signed; no event was produced.
    #[error("failed to sign event: {0}")]
    Signing(#[source] CryptoError),

    /// The event's key or signature is malformed, or the signature does not
    /// match the payload.
    #[error("event verification failed: {0}")]
    Verification(#[source] CryptoError),

    /// The event references a parent the store has never accepted, and the
    /// store rejects dangling references.
    #[error("event references unknown parent {parent}")]
    UnknownParent {
        /// The missing parent hash.
        parent: String,
    },
}
