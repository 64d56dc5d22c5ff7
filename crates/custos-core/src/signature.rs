//! Signature records
//!
//! One record per (transaction, signer). A record's `verified` flag is set
//! exactly once, by the Verifier, and never reverted; a signer may replace
//! their own record only while it is unverified.

use crate::crypto::Signature;
use crate::identifiers::{ActorId, KeyRef};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Signature scheme used for a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignatureAlgorithm {
    /// Ed25519 over the canonical transaction hash
    Ed25519,
}

impl fmt::Display for SignatureAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ed25519 => write!(f, "ed25519"),
        }
    }
}

/// One signer's cryptographic authorization of a transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureRecord {
    /// Who produced the signature
    pub signer: ActorId,
    /// Key Vault reference to the signing key
    pub key_ref: KeyRef,
    /// Signature scheme
    pub algorithm: SignatureAlgorithm,
    /// Signature over the canonical transaction hash
    pub signature: Signature,
    /// Set exactly once by the Verifier on cryptographic success
    pub verified: bool,
    /// Unix milliseconds when the signature was recorded
    pub signed_at: u64,
    /// Unix milliseconds when verification succeeded
    pub verified_at: Option<u64>,
}

impl SignatureRecord {
    /// Build a fresh, unverified record
    pub fn unverified(
        signer: ActorId,
        key_ref: KeyRef,
        algorithm: SignatureAlgorithm,
        signature: Signature,
        signed_at: u64,
    ) -> Self {
        Self {
            signer,
            key_ref,
            algorithm,
            signature,
            verified: false,
            signed_at,
            verified_at: None,
        }
    }

    /// Mark the record verified; no-op if already verified
    pub fn mark_verified(&mut self, verified_at: u64) {
        if !self.verified {
            self.verified = true;
            self.verified_at = Some(verified_at);
        }
    }
}
