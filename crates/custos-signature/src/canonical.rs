//! Canonical transaction hash
//!
//! Every signer commits to the same digest: SHA-256 over the DAG-CBOR
//! encoding of the intent. DAG-CBOR sorts map keys and admits no
//! whitespace or field-order variance, so the digest is independent of who
//! serializes.

use custos_core::{hash, serialization, CustosResult, TransactionIntent};

/// Canonical bytes of an intent
pub fn canonical_intent_bytes(intent: &TransactionIntent) -> CustosResult<Vec<u8>> {
    serialization::to_vec(intent)
}

/// The digest signers sign and verifiers check
pub fn canonical_intent_hash(intent: &TransactionIntent) -> CustosResult<hash::Digest32> {
    serialization::hash_canonical(intent)
}
