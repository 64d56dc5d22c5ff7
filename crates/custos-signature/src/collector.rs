//! Signature record collection

use custos_core::{
    ActorId, CustosError, CustosResult, KeyRef, Signature, SignatureAlgorithm, SignatureRecord,
    TransactionAuthorization,
};

/// Store a signer's signature on the authorization
///
/// One record per signer. A signer re-signing replaces their own record
/// while it is unverified — a fresh signature supersedes a stale attempt —
/// but a verified record is immutable and the attempt is refused.
pub fn record_signature(
    authorization: &mut TransactionAuthorization,
    signer: ActorId,
    key_ref: KeyRef,
    algorithm: SignatureAlgorithm,
    signature: Signature,
    now_ms: u64,
) -> CustosResult<()> {
    if let Some(existing) = authorization
        .signatures
        .iter_mut()
        .find(|record| record.signer == signer)
    {
        if existing.verified {
            return Err(CustosError::signature_verification(format!(
                "{signer} already holds a verified signature on {}",
                authorization.id()
            )));
        }
        *existing = SignatureRecord::unverified(signer, key_ref, algorithm, signature, now_ms);
        tracing::debug!(
            transaction_id = %authorization.id(),
            %signer,
            "unverified signature replaced"
        );
        return Ok(());
    }

    authorization
        .signatures
        .push(SignatureRecord::unverified(
            signer, key_ref, algorithm, signature, now_ms,
        ));
    tracing::debug!(
        transaction_id = %authorization.id(),
        %signer,
        signatures = authorization.signatures.len(),
        "signature recorded"
    );
    Ok(())
}
