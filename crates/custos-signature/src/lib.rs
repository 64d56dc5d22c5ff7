//! Signature collection and verification
//!
//! Signatures are cryptographic proof of authorization, tracked separately
//! from approval votes: the policy decides how many of each a transaction
//! needs. All functions here are pure over the aggregate and the inputs
//! the orchestrator fetched up front — Key Vault round-trips never happen
//! inside the per-transaction exclusivity boundary.

#![forbid(unsafe_code)]

mod canonical;
mod collector;
mod verifier;

pub use canonical::{canonical_intent_bytes, canonical_intent_hash};
pub use collector::record_signature;
pub use verifier::{threshold_met, verify_records, VerifyOutcome};
