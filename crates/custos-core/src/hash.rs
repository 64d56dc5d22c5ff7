//! Centralized cryptographic hashing
//!
//! One place selects the digest algorithm for the whole pipeline. Canonical
//! transaction hashes, execution receipts, and any future commitment all go
//! through this module, so swapping the algorithm is a single-site change.
//!
//! Current algorithm: **SHA-256** (32-byte output).

use sha2::{Digest, Sha256};

/// Output length of the configured digest in bytes
pub const HASH_LENGTH: usize = 32;

/// 32-byte digest produced by [`hash`]
pub type Digest32 = [u8; HASH_LENGTH];

/// Hash a byte slice with the configured algorithm
pub fn hash(data: &[u8]) -> Digest32 {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Hex-encode a digest for display and receipts
pub fn to_hex(digest: &Digest32) -> String {
    hex::encode(digest)
}
