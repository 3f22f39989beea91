//! Error types for the cryptographic primitives.

/// Errors that can occur while generating keys, hashing, signing or verifying.
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    /// The operating system entropy source could not supply a key seed.
    #[error("key generation failed: {0}")]
    KeyGeneration(#[from] rand::Error),

    /// A payload could not be serialised into its canonical form.
    #[error("payload canonicalization failed: {0}")]
    Canonicalization(#[from] serde_json::Error),

    /// The private key is not a valid 64-byte Ed25519 key pair encoding.
    #[error("malformed private key: {0}")]
    MalformedPrivateKey(String),

    /// The public key supplied alongside a private key does not belong to it.
    #[error("public key does not match private key")]
    KeyMismatch,

    /// The public key is not valid hex or not a 32-byte Ed25519 point.
    #[error("malformed public key: {0}")]
    MalformedPublicKey(String),

    /// The signature is not valid hex or not 64 bytes long.
    #[error("malformed signature: {0}")]
    MalformedSignature(String),

    /// The signature is well-formed but does not verify against the key.
    #[error("signature verification failed")]
    InvalidSignature,
}
