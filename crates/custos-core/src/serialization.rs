//! DAG-CBOR canonical serialization for Custos core types
//!
//! DAG-CBOR gives a deterministic canonical encoding: map keys are sorted
//! and there is no whitespace or field-order variance. The canonical
//! transaction hash that signers commit to is the SHA-256 digest of this
//! encoding, so two processes serializing the same intent always produce
//! the same bytes.

use crate::errors::{CustosError, CustosResult};
use crate::hash;
use serde::{de::DeserializeOwned, Serialize};

/// Serialize any serde-compatible type to canonical DAG-CBOR bytes
pub fn to_vec<T: Serialize>(value: &T) -> CustosResult<Vec<u8>> {
    serde_ipld_dagcbor::to_vec(value)
        .map_err(|e| CustosError::serialization(format!("DAG-CBOR encode failed: {e}")))
}

/// Deserialize canonical DAG-CBOR bytes
pub fn from_slice<T: DeserializeOwned>(bytes: &[u8]) -> CustosResult<T> {
    serde_ipld_dagcbor::from_slice(bytes)
        .map_err(|e| CustosError::serialization(format!("DAG-CBOR decode failed: {e}")))
}

/// Serialize to canonical bytes and return the digest
pub fn hash_canonical<T: Serialize>(value: &T) -> CustosResult<hash::Digest32> {
    let bytes = to_vec(value)?;
    Ok(hash::hash(&bytes))
}

/// Optional JSON export for debugging (feature-gated)
///
/// Not a wire format; canonical bytes are always DAG-CBOR.
#[cfg(feature = "json-debug")]
pub mod json_debug {
    use serde::Serialize;

    /// Serialize to pretty JSON for debugging
    pub fn to_json_pretty<T: Serialize>(value: &T) -> serde_json::Result<String> {
        serde_json::to_string_pretty(value)
    }
}
