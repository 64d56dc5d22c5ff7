//! Per-record signature verification

use custos_core::{
    crypto, ActorId, CustosError, CustosResult, KeyRef, PublicKey, TransactionAuthorization,
};
use std::collections::HashMap;

/// Outcome of one verification pass
///
/// Verification is per-record, never all-or-nothing: one bad signature
/// leaves every sibling record untouched.
#[derive(Debug, Clone, Default)]
pub struct VerifyOutcome {
    /// Signers whose records passed verification in this pass
    pub newly_verified: Vec<ActorId>,
    /// Signers whose records failed, with the per-record error
    pub failures: Vec<(ActorId, CustosError)>,
}

impl VerifyOutcome {
    /// Whether this pass changed any record
    pub fn changed_anything(&self) -> bool {
        !self.newly_verified.is_empty()
    }
}

/// Verify every unverified record whose key was fetched
///
/// `keys` maps each record's `key_ref` to the vault lookup result the
/// orchestrator performed outside the exclusivity boundary. Records whose
/// key is absent from the map are left for a later pass. A record's
/// `verified` flag flips to `true` only on cryptographic success and never
/// reverts.
pub fn verify_records(
    authorization: &mut TransactionAuthorization,
    message: &[u8],
    keys: &HashMap<KeyRef, CustosResult<PublicKey>>,
    now_ms: u64,
) -> VerifyOutcome {
    let transaction_id = authorization.id();
    let mut outcome = VerifyOutcome::default();

    for record in authorization
        .signatures
        .iter_mut()
        .filter(|record| !record.verified)
    {
        let lookup = match keys.get(&record.key_ref) {
            Some(lookup) => lookup,
            None => continue,
        };
        match lookup {
            Ok(public_key) => match crypto::ed25519_verify(message, &record.signature, public_key)
            {
                Ok(true) => {
                    record.mark_verified(now_ms);
                    tracing::debug!(
                        transaction_id = %transaction_id,
                        signer = %record.signer,
                        "signature verified"
                    );
                    outcome.newly_verified.push(record.signer);
                }
                Ok(false) => {
                    outcome.failures.push((
                        record.signer,
                        CustosError::signature_verification(format!(
                            "signature by {} does not match key {}",
                            record.signer, record.key_ref
                        )),
                    ));
                }
                Err(error) => {
                    outcome.failures.push((record.signer, error));
                }
            },
            Err(error) => {
                outcome.failures.push((record.signer, error.clone()));
            }
        }
    }

    outcome
}

/// Whether enough distinct signers hold verified records
pub fn threshold_met(authorization: &TransactionAuthorization) -> bool {
    authorization.verified_signer_count()
        >= usize::from(authorization.policy.required_signatures)
}
