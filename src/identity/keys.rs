//! API key secrets and their public hashes.
//!
//! A caller keeps the secret; the contract only ever sees
//! `keccak256(secret)`. Secrets are not logged, sent or stored here.

use alloy::hex;
use alloy::primitives::keccak256;
use rand::rngs::OsRng;
use rand::RngCore;

use crate::blockchain::types::{ClientError, ClientResult, PublicHash};

/// Bytes of entropy in a generated secret.
pub const SECRET_LEN: usize = 32;

/// A caller-held API key secret.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    /// Textual form to hand to the key holder.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// On-chain lookup key for this secret.
    pub fn public_hash(&self) -> PublicHash {
        derive_key_hash(&self.0)
    }
}

impl From<String> for Secret {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for Secret {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Secret(<redacted>)")
    }
}

/// Raw bytes a secret is hashed over.
///
/// `0x`-prefixed, non-empty, even-length hex (the form [`generate_secret`]
/// produces) is decoded; anything else is taken as its UTF-8 bytes.
fn secret_bytes(secret: &str) -> Vec<u8> {
    match secret.strip_prefix("0x") {
        Some(body) if is_hex_body(body) => match hex::decode(body) {
            Ok(bytes) => bytes,
            Err(_) => secret.as_bytes().to_vec(),
        },
        _ => secret.as_bytes().to_vec(),
    }
}

// `hex::decode` would strip a second `0x` on its own.
fn is_hex_body(body: &str) -> bool {
    !body.is_empty() && body.len() % 2 == 0 && body.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Map a secret to its 32-byte public hash. Pure and total.
pub fn derive_key_hash(secret: &str) -> PublicHash {
    keccak256(secret_bytes(secret))
}

/// Produce a fresh secret from the OS randomness source.
pub fn generate_secret() -> ClientResult<Secret> {
    let mut bytes = [0u8; SECRET_LEN];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| ClientError::Identity(format!("randomness source unavailable: {}", e)))?;
    Ok(Secret(hex::encode_prefixed(bytes)))
}
