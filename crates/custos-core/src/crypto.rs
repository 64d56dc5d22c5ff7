//! Ed25519 primitives for signature collection and verification
//!
//! Custos never holds private key material; signing is delegated to the Key
//! Vault. This module provides the public-key and signature value types that
//! travel through the pipeline, plus the verification primitive used by the
//! Signature Verifier.

use crate::errors::{CustosError, CustosResult};
use ed25519_dalek::VerifyingKey;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Length of an Ed25519 public key in bytes
pub const PUBLIC_KEY_LENGTH: usize = 32;

/// Length of an Ed25519 signature in bytes
pub const SIGNATURE_LENGTH: usize = 64;

/// An Ed25519 public key fetched from the Key Vault
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKey(Vec<u8>);

impl PublicKey {
    /// Construct from raw bytes, validating the length
    pub fn from_bytes(bytes: Vec<u8>) -> CustosResult<Self> {
        if bytes.len() != PUBLIC_KEY_LENGTH {
            return Err(CustosError::key_not_found(format!(
                "public key must be {PUBLIC_KEY_LENGTH} bytes, got {}",
                bytes.len()
            )));
        }
        Ok(Self(bytes))
    }

    /// Raw key bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Hex encoding for logs and audit details
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self.to_hex())
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// An Ed25519 signature produced by the Key Vault
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature(Vec<u8>);

impl Signature {
    /// Construct from raw bytes, validating the length
    pub fn from_bytes(bytes: Vec<u8>) -> CustosResult<Self> {
        if bytes.len() != SIGNATURE_LENGTH {
            return Err(CustosError::signature_verification(format!(
                "signature must be {SIGNATURE_LENGTH} bytes, got {}",
                bytes.len()
            )));
        }
        Ok(Self(bytes))
    }

    /// Raw signature bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Hex encoding for logs and audit details
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({})", self.to_hex())
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// Verify an Ed25519 signature over a message
///
/// Returns `Ok(true)` on cryptographic success, `Ok(false)` when the
/// signature does not match, and `Err` only when the key or signature bytes
/// are malformed.
pub fn ed25519_verify(
    message: &[u8],
    signature: &Signature,
    public_key: &PublicKey,
) -> CustosResult<bool> {
    let key_bytes: [u8; PUBLIC_KEY_LENGTH] = public_key
        .as_bytes()
        .try_into()
        .map_err(|_| CustosError::key_not_found("malformed public key bytes"))?;
    let verifying_key = VerifyingKey::from_bytes(&key_bytes).map_err(|e| {
        CustosError::signature_verification(format!("invalid Ed25519 public key: {e}"))
    })?;

    let sig_bytes: [u8; SIGNATURE_LENGTH] = signature
        .as_bytes()
        .try_into()
        .map_err(|_| CustosError::signature_verification("malformed signature bytes"))?;
    let signature = ed25519_dalek::Signature::from_bytes(&sig_bytes);

    Ok(verifying_key.verify_strict(message, &signature).is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ed25519_dalek::{Signer, SigningKey};
    use rand_chacha::ChaCha20Rng;
    use rand_core::SeedableRng;

    fn keypair(seed: u64) -> (SigningKey, PublicKey) {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let signing_key = SigningKey::generate(&mut rng);
        let public_key = PublicKey::from_bytes(signing_key.verifying_key().to_bytes().to_vec())
            .expect("32-byte key");
        (signing_key, public_key)
    }

    #[test]
    fn test_verify_valid_signature() {
        let (signing_key, public_key) = keypair(11);
        let message = b"canonical transaction hash";
        let signature =
            Signature::from_bytes(signing_key.sign(message).to_bytes().to_vec()).unwrap();

        assert!(ed25519_verify(message, &signature, &public_key).unwrap());
    }

    #[test]
    fn test_verify_rejects_wrong_message() {
        let (signing_key, public_key) = keypair(12);
        let signature =
            Signature::from_bytes(signing_key.sign(b"original").to_bytes().to_vec()).unwrap();

        assert!(!ed25519_verify(b"tampered", &signature, &public_key).unwrap());
    }

    #[test]
    fn test_verify_rejects_wrong_key() {
        let (signing_key, _) = keypair(13);
        let (_, other_key) = keypair(14);
        let message = b"canonical transaction hash";
        let signature =
            Signature::from_bytes(signing_key.sign(message).to_bytes().to_vec()).unwrap();

        assert!(!ed25519_verify(message, &signature, &other_key).unwrap());
    }

    #[test]
    fn test_length_validation() {
        assert!(PublicKey::from_bytes(vec![0u8; 16]).is_err());
        assert!(Signature::from_bytes(vec![0u8; 63]).is_err());
    }
}
