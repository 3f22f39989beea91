//! Ed25519 signing and verification over hex-encoded payload digests.

use ed25519_dalek::{Signature, Signer, Verifier, VerifyingKey};

use crate::error::CryptoError;
use crate::keys::{signing_key_from_bytes, PUBLIC_KEY_LENGTH};

/// Length in bytes of an Ed25519 signature.
pub const SIGNATURE_LENGTH: usize = ed25519_dalek::SIGNATURE_LENGTH;

/// Signs the UTF-8 bytes of `hash_hex` with a 64-byte private key and
/// returns the signature as lowercase hex.
///
/// # Errors
///
/// Returns `CryptoError::MalformedPrivateKey` if the private key cannot be
/// parsed.
pub fn sign(hash_hex: &str, private_key: &[u8]) -> Result<String, CryptoError> {
    let signing_key = signing_key_from_bytes(private_key)?;
    let signature = signing_key.sign(hash_hex.as_bytes());
    Ok(hex::encode(signature.to_bytes()))
}

/// Verifies a hex signature over the UTF-8 bytes of `hash_hex` against a hex
/// public key.
///
/// # Errors
///
/// - `CryptoError::MalformedPublicKey` for bad hex, wrong length, or a
///   byte string that is not a curve point.
/// - `CryptoError::MalformedSignature` for bad hex or wrong length.
/// - `CryptoError::InvalidSignature` when the signature does not verify.
pub fn verify(hash_hex: &str, signature_hex: &str, public_key_hex: &str) -> Result<(), CryptoError> {
    let public_key = parse_public_key(public_key_hex)?;
    let signature = parse_signature(signature_hex)?;
    public_key
        .verify(hash_hex.as_bytes(), &signature)
        .map_err(|_| CryptoError::InvalidSignature)
}

fn parse_public_key(public_key_hex: &str) -> Result<VerifyingKey, CryptoError> {
    let bytes = hex::decode(public_key_hex)
        .map_err(|e| CryptoError::MalformedPublicKey(format!("invalid hex: {e}")))?;
    let bytes: [u8; PUBLIC_KEY_LENGTH] = bytes.try_into().map_err(|b: Vec<u8>| {
        CryptoError::MalformedPublicKey(format!(
            "expected {PUBLIC_KEY_LENGTH} bytes, got {}",
            b.len()
        ))
    })?;
    VerifyingKey::from_bytes(&bytes).map_err(|e| CryptoError::MalformedPublicKey(e.to_string()))
}

fn parse_signature(signature_hex: &str) -> Result<Signature, CryptoError> {
    let bytes = hex::decode(signature_hex)
        .map_err(|e| CryptoError::MalformedSignature(format!("invalid hex: {e}")))?;
    let bytes: [u8; SIGNATURE_LENGTH] = bytes.try_into().map_err(|b: Vec<u8>| {
        CryptoError::MalformedSignature(format!(
            "expected {SIGNATURE_LENGTH} bytes, got {}",
            b.len()
        ))
    })?;
    Ok(Signature::from_bytes(&bytes))
}
