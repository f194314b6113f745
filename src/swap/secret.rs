//! Swap secrets
//!
//! The preimage whose SHA256 is embedded in the locking script. Secret bytes
//! are wiped from memory when dropped.

use rand::RngCore;
use sha2::{Digest, Sha256};
use std::fmt;
use zeroize::Zeroizing;

use crate::error::{Result, SwapScriptError};

use super::locking::SECRET_SIZE;

#[derive(Clone, PartialEq, Eq)]
pub struct Secret {
    bytes: Zeroizing<Vec<u8>>,
}

impl Secret {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self {
            bytes: Zeroizing::new(bytes),
        }
    }

    pub fn from_hex(hex_str: &str) -> Result<Self> {
        hex::decode(hex_str.trim())
            .map(Self::from_bytes)
            .map_err(|e| SwapScriptError::hex("secret", e))
    }

    /// Derive a secret from a wallet signature over a swap-specific message.
    ///
    /// Lets a party recompute its secret later from the same message
    /// instead of persisting it.
    pub fn from_signature(signature: &[u8]) -> Self {
        Self::from_bytes(Sha256::digest(signature).to_vec())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes.as_slice())
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn hash(&self) -> [u8; 32] {
        secret_hash(&self.bytes)
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Secret([REDACTED; {}])", self.bytes.len())
    }
}

/// Fresh random 32-byte secret
pub fn generate_secret() -> Secret {
    let mut bytes = vec![0u8; SECRET_SIZE];
    rand::thread_rng().fill_bytes(&mut bytes);
    Secret::from_bytes(bytes)
}

pub fn secret_hash(secret: &[u8]) -> [u8; 32] {
    Sha256::digest(secret).into()
}

/// True if `secret` hashes to `hash` and has the size the script enforces
pub fn verify_secret(secret: &[u8], hash: &[u8; 32]) -> bool {
    secret.len() == SECRET_SIZE && secret_hash(secret) == *hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_secret() {
        let a = generate_secret();
        let b = generate_secret();
        assert_eq!(a.len(), 32);
        assert_ne!(a, b);
        assert!(verify_secret(a.as_bytes(), &a.hash()));
    }

    #[test]
    fn test_known_hash() {
        // SHA256("")
        assert_eq!(
            hex::encode(secret_hash(b"")),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_verify_secret_rejects_wrong_size() {
        let short = [0x42u8; 10];
        assert!(!verify_secret(&short, &secret_hash(&short)));
    }

    #[test]
    fn test_verify_secret_rejects_wrong_hash() {
        let secret = generate_secret();
        let mut hash = secret.hash();
        hash[0] ^= 1;
        assert!(!verify_secret(secret.as_bytes(), &hash));
    }

    #[test]
    fn test_from_signature_is_deterministic() {
        let a = Secret::from_signature(b"signature bytes");
        let b = Secret::from_signature(b"signature bytes");
        assert_eq!(a, b);
        assert_eq!(a.len(), 32);
    }

    #[test]
    fn test_debug_redacts() {
        let secret = Secret::from_hex("deadbeef").unwrap();
        assert_eq!(format!("{secret:?}"), "Secret([REDACTED; 4])");
        assert_eq!(secret.to_hex(), "deadbeef");
    }
}
