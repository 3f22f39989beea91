//! Ed25519 key pairs held in memory for the lifetime of an agent.

use std::fmt;

use ed25519_dalek::{Signer, SigningKey, SECRET_KEY_LENGTH};
use rand::rngs::OsRng;
use rand::RngCore;

use crate::error::CryptoError;

/// Length in bytes of an Ed25519 public key.
pub const PUBLIC_KEY_LENGTH: usize = ed25519_dalek::PUBLIC_KEY_LENGTH;

/// Length in bytes of a private key: the 32-byte seed followed by the
/// 32-byte public key.
pub const PRIVATE_KEY_LENGTH: usize = ed25519_dalek::KEYPAIR_LENGTH;

/// An Ed25519 signing key together with its public half.
///
/// The private half never leaves process memory; there is no persisted
/// key storage.
#[derive(Clone)]
pub struct KeyPair {
    signing_key: SigningKey,
}

impl KeyPair {
    /// Generates a fresh key pair from the operating system entropy source.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::KeyGeneration` if the entropy source fails.
    /// Callers treat this as fatal and do not retry.
    pub fn generate() -> Result<Self, CryptoError> {
        let mut seed = [0u8; SECRET_KEY_LENGTH];
        OsRng.try_fill_bytes(&mut seed)?;
        Ok(Self {
            signing_key: SigningKey::from_bytes(&seed),
        })
    }

    /// Reconstructs a key pair from its 64-byte private key encoding.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::MalformedPrivateKey` if the slice has the wrong
    /// length or its embedded public key does not match the seed.
    pub fn from_private_key_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        Ok(Self {
            signing_key: signing_key_from_bytes(bytes)?,
        })
    }

    /// Returns the raw 32-byte public key.
    pub fn public_key_bytes(&self) -> [u8; PUBLIC_KEY_LENGTH] {
        self.signing_key.verifying_key().to_bytes()
    }

    /// Returns the public key as lowercase hex, the form used on the wire
    /// and as the agent registry key.
    pub fn public_key_hex(&self) -> String {
        hex::encode(self.public_key_bytes())
    }

    /// Returns the 64-byte private key encoding (seed followed by public key).
    pub fn private_key_bytes(&self) -> [u8; PRIVATE_KEY_LENGTH] {
        self.signing_key.to_keypair_bytes()
    }

    /// Signs the UTF-8 bytes of `hash_hex` and returns the signature as hex.
    ///
    /// Equivalent to [`sign`](crate::sign) with [`Self::private_key_bytes`],
    /// without re-parsing the key.
    pub fn sign(&self, hash_hex: &str) -> String {
        hex::encode(self.signing_key.sign(hash_hex.as_bytes()).to_bytes())
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("public_key", &self.public_key_hex())
            .field("private_key", &"[REDACTED]")
            .finish()
    }
}

/// Parses a 64-byte private key, checking the embedded public half.
pub(crate) fn signing_key_from_bytes(bytes: &[u8]) -> Result<SigningKey, CryptoError> {
    let keypair: &[u8; PRIVATE_KEY_LENGTH] = bytes.try_into().map_err(|_| {
        CryptoError::MalformedPrivateKey(format!(
            "expected {PRIVATE_KEY_LENGTH} bytes, got {}",
            bytes.len()
        ))
    })?;
    SigningKey::from_keypair_bytes(keypair)
        .map_err(|e| CryptoError::MalformedPrivateKey(e.to_string()))
}
