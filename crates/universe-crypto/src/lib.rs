//! Cryptographic primitives for the Blockchain Universe event ledger.
//!
//! Every event in the ledger is identified by a SHA3-512 digest of its
//! payload and signed with Ed25519 by its author. This crate owns the four
//! operations the ledger builds on:
//!
//! | Operation | Function |
//! |-----------|----------|
//! | Key pair generation | [`KeyPair::generate`] |
//! | Payload hashing | [`hash_payload`] |
//! | Signing | [`sign`] |
//! | Verification | [`verify`] |
//!
//! # Signing convention
//!
//! Signatures are computed over the UTF-8 bytes of the lowercase hex
//! encoding of the payload digest, not over the raw 64 digest bytes.
//! Other implementations must follow the same convention to interoperate.
//!
//! ```rust,ignore
//! use universe_crypto::{hash_payload, sign, verify, KeyPair};
//!
//! let keys = KeyPair::generate()?;
//! let hash = hash_payload(&payload)?;
//! let signature = sign(&hash, &keys.private_key_bytes())?;
//! verify(&hash, &signature, &keys.public_key_hex())?;
//! ```

mod error;
mod hash;
mod keys;
mod signature;

pub use error::CryptoError;
pub use hash::{canonical_json, hash_bytes, hash_payload, DIGEST_LENGTH};
pub use keys::{KeyPair, PRIVATE_KEY_LENGTH, PUBLIC_KEY_LENGTH};
pub use signature::{sign, verify, SIGNATURE_LENGTH};
