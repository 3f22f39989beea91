//! Deterministic SHA3-512 hashing of event payloads.

use std::io;

use serde::Serialize;
use serde_json::ser::Formatter;
use sha3::{Digest, Sha3_512};

use crate::error::CryptoError;

/// Length in bytes of a payload digest.
pub const DIGEST_LENGTH: usize = 64;

/// Computes the SHA3-512 digest of raw bytes.
pub fn hash_bytes(bytes: &[u8]) -> [u8; DIGEST_LENGTH] {
    let mut hasher = Sha3_512::new();
    hasher.update(bytes);
    hasher.finalize().into()
}

/// Serialises `value` to its canonical JSON bytes.
///
/// Output is compact `serde_json` with Go `encoding/json` string escaping:
/// `<`, `>`, `&`, U+2028 and U+2029 are written as `\uXXXX` escapes. The
/// caller's type must serialise deterministically: struct fields in
/// declaration order and maps with ordered keys (`BTreeMap`, not `HashMap`).
///
/// # Errors
///
/// Returns `CryptoError::Canonicalization` if the value cannot be
/// serialised.
pub fn canonical_json<T>(value: &T) -> Result<Vec<u8>, CryptoError>
where
    T: Serialize + ?Sized,
{
    let mut out = Vec::with_capacity(256);
    let mut ser = serde_json::Serializer::with_formatter(&mut out, GoEscapeFormatter);
    value.serialize(&mut ser)?;
    Ok(out)
}

/// Hashes the canonical JSON serialisation of `payload` (see
/// [`canonical_json`]) and returns the digest as lowercase hex.
///
/// # Errors
///
/// Returns `CryptoError::Canonicalization` if the payload cannot be
/// serialised.
pub fn hash_payload<T>(payload: &T) -> Result<String, CryptoError>
where
    T: Serialize + ?Sized,
{
    let canonical = canonical_json(payload)?;
    Ok(hex::encode(hash_bytes(&canonical)))
}

/// Compact formatter that additionally escapes the characters Go's
/// `json.Marshal` escapes in strings. Quotes, backslashes and control
/// characters are already escaped identically by `serde_json`.
struct GoEscapeFormatter;

impl Formatter for GoEscapeFormatter {
    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let bytes = fragment.as_bytes();
        let mut start = 0;
        for (i, c) in fragment.char_indices() {
            let escaped = match c {
                '<' => "\\u003c",
                '>' => "\\u003e",
                '&' => "\\u0026",
                '\u{2028}' => "\\u2028",
                '\u{2029}' => "\\u2029",
                _ => continue,
            };
            writer.write_all(&bytes[start..i])?;
            writer.write_all(escaped.as_bytes())?;
            start = i + c.len_utf8();
        }
        writer.write_all(&bytes[start..])
    }
}
