//! The authorization engine

use crate::retry::RetryPolicy;
use custos_core::{
    hash, ActorId, AuditEffects, AuditEvent, AuditEventKind, AuthorizationStatus,
    AuthorizationStore, ClockEffects, CustosError, CustosResult, DirectoryEffects, ExecutionResult,
    HistoryEffects, KeyRef, KeyVaultEffects, RiskAssessment, SignatureAlgorithm,
    TransactionAuthorization, TransactionId, TransactionIntent, Version, VoteDecision,
};
use custos_ledger::{Tally, VoteVerdict};
use custos_policy::PolicyResolver;
use custos_risk::RiskScorer;
use custos_signature::{canonical_intent_hash, VerifyOutcome};
use std::collections::HashMap;
use std::sync::Arc;

/// Effect handlers the engine is wired with
///
/// Lifecycle is owned by whoever assembles the application; the engine
/// holds shared handles and no hidden global state.
#[derive(Clone)]
pub struct EngineServices {
    /// Wall clock for timestamps and expiry
    pub clock: Arc<dyn ClockEffects>,
    /// Key custody collaborator
    pub vault: Arc<dyn KeyVaultEffects>,
    /// Decision-trail recorder
    pub audit: Arc<dyn AuditEffects>,
    /// Recent-activity source for risk scoring
    pub history: Arc<dyn HistoryEffects>,
    /// Actor roster and roles
    pub directory: Arc<dyn DirectoryEffects>,
    /// Versioned aggregate persistence
    pub store: Arc<dyn AuthorizationStore>,
}

/// Result of one `verify` call
#[derive(Debug, Clone)]
pub struct VerifyReport {
    /// Signers whose records passed verification in this call
    pub newly_verified: Vec<ActorId>,
    /// Signers whose records failed, with the per-record error
    pub failures: Vec<(ActorId, CustosError)>,
    /// Whether the signature threshold is met after this call
    pub threshold_met: bool,
    /// Status after this call
    pub status: AuthorizationStatus,
}

/// Orchestrates the authorization lifecycle for concurrent callers
///
/// Every operation names its acting principal explicitly; there is no
/// ambient "current actor".
#[derive(Clone)]
pub struct AuthorizationEngine {
    scorer: RiskScorer,
    resolver: PolicyResolver,
    services: EngineServices,
    retry: RetryPolicy,
}

impl AuthorizationEngine {
    /// Wire an engine from its services
    pub fn new(scorer: RiskScorer, resolver: PolicyResolver, services: EngineServices) -> Self {
        Self {
            scorer,
            resolver,
            services,
            retry: RetryPolicy::default(),
        }
    }

    /// Override the contention retry bounds
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Submit an intent and open its authorization
    ///
    /// Scores risk (degrading, never failing, when history is down),
    /// resolves the policy, and persists a `Pending` aggregate.
    pub async fn initiate(
        &self,
        intent: TransactionIntent,
        actor: ActorId,
    ) -> CustosResult<TransactionId> {
        intent.validate()?;
        let now = self.services.clock.now_ms().await;
        let assessment = self
            .scorer
            .assess(&intent, self.services.history.as_ref(), now)
            .await;
        let policy = self
            .resolver
            .resolve(intent.kind, intent.amount, assessment.score)?;

        let authorization = TransactionAuthorization::new(intent, assessment, policy, now);
        let id = authorization.id();
        let details = format!(
            "score {}, rule '{}' v{}: {} approvals / {} signatures required, expires at {}",
            authorization.assessment.score,
            authorization.policy.rule_name,
            authorization.policy.ruleset_version,
            authorization.policy.required_approvals,
            authorization.policy.required_signatures,
            authorization.expires_at,
        );
        self.services.store.insert(authorization).await?;

        self.audit_info(AuditEventKind::AuthorizationInitiated, id, Some(actor), details)
            .await;
        tracing::info!(transaction_id = %id, %actor, "authorization initiated");
        Ok(id)
    }

    /// Cast an approve vote
    pub async fn approve(
        &self,
        id: TransactionId,
        actor: ActorId,
        comment: Option<String>,
    ) -> CustosResult<AuthorizationStatus> {
        self.cast_vote(id, actor, VoteDecision::Approve, comment).await
    }

    /// Cast a reject vote with a reason
    pub async fn reject(
        &self,
        id: TransactionId,
        actor: ActorId,
        reason: impl Into<String>,
    ) -> CustosResult<AuthorizationStatus> {
        self.cast_vote(id, actor, VoteDecision::Reject, Some(reason.into()))
            .await
    }

    async fn cast_vote(
        &self,
        id: TransactionId,
        actor: ActorId,
        decision: VoteDecision,
        comment: Option<String>,
    ) -> CustosResult<AuthorizationStatus> {
        let role = self.services.directory.role_of(actor).await;
        let mut attempt = 0;
        loop {
            let now = self.services.clock.now_ms().await;
            let (mut authorization, version) = self.services.store.load(id).await?;
            if let Err(error) = self.gate_operation(&mut authorization, version, now, actor).await {
                self.audit_warning(AuditEventKind::VoteRefused, id, Some(actor), error.to_string())
                    .await;
                return Err(error);
            }
            if authorization.status == AuthorizationStatus::Signed {
                let error = CustosError::terminal_state(format!(
                    "{id} is signed; voting is closed"
                ));
                self.audit_warning(AuditEventKind::VoteRefused, id, Some(actor), error.to_string())
                    .await;
                return Err(error);
            }

            if let Err(error) = custos_ledger::cast_vote(
                &mut authorization,
                actor,
                role.clone(),
                decision,
                comment.clone(),
                now,
            ) {
                self.audit_warning(AuditEventKind::VoteRefused, id, Some(actor), error.to_string())
                    .await;
                return Err(error);
            }

            let tally = custos_ledger::tally(&authorization);
            let pool = self
                .services
                .directory
                .eligible_count(&authorization.policy.eligible_roles)
                .await;
            let before = authorization.status;
            match custos_ledger::verdict(&tally, &authorization.policy, pool) {
                VoteVerdict::Approved if before == AuthorizationStatus::Pending => {
                    authorization.transition_to(AuthorizationStatus::Approved)?;
                }
                VoteVerdict::Rejected => {
                    authorization.transition_to(AuthorizationStatus::Rejected)?;
                }
                _ => {}
            }
            let after = authorization.status;

            match self.services.store.update(id, version, authorization).await {
                Ok(_) => {
                    self.audit_info(
                        AuditEventKind::VoteCast,
                        id,
                        Some(actor),
                        format!(
                            "{decision}: {} approvals / {} rejections",
                            tally.approvals, tally.rejections
                        ),
                    )
                    .await;
                    if after != before {
                        self.audit_info(
                            AuditEventKind::StatusChanged,
                            id,
                            Some(actor),
                            format!("{before} -> {after} on vote"),
                        )
                        .await;
                    }
                    return Ok(after);
                }
                Err(error) if error.is_retryable() && self.retry.allows_retry(attempt) => {
                    attempt += 1;
                    tokio::time::sleep(self.retry.delay(attempt)).await;
                }
                Err(error) => {
                    self.audit_warning(
                        AuditEventKind::VoteRefused,
                        id,
                        Some(actor),
                        error.to_string(),
                    )
                    .await;
                    return Err(error);
                }
            }
        }
    }

    /// Produce and record a signature over the canonical transaction hash
    ///
    /// Only accepted once the authorization is `Approved` (or already
    /// `Signed`, for surplus signatures). The Key Vault round-trip happens
    /// before the optimistic write, never inside it.
    pub async fn sign(
        &self,
        id: TransactionId,
        signer: ActorId,
        key_ref: KeyRef,
    ) -> CustosResult<AuthorizationStatus> {
        // Preflight on a snapshot so an obviously refused attempt never
        // reaches the vault.
        let now = self.services.clock.now_ms().await;
        let (mut authorization, version) = self.services.store.load(id).await?;
        if let Err(error) = self.gate_operation(&mut authorization, version, now, signer).await {
            self.audit_warning(AuditEventKind::SignatureRefused, id, Some(signer), error.to_string())
                .await;
            return Err(error);
        }
        if let Err(error) = Self::require_signing_stage(&authorization) {
            self.audit_warning(AuditEventKind::SignatureRefused, id, Some(signer), error.to_string())
                .await;
            return Err(error);
        }
        if let Some(record) = authorization.signature_by(signer) {
            if record.verified {
                let error = CustosError::signature_verification(format!(
                    "{signer} already holds a verified signature on {id}"
                ));
                self.audit_warning(
                    AuditEventKind::SignatureRefused,
                    id,
                    Some(signer),
                    error.to_string(),
                )
                .await;
                return Err(error);
            }
        }

        let message = canonical_intent_hash(&authorization.intent)?;
        let signature = match self.services.vault.sign(&message, key_ref).await {
            Ok(signature) => signature,
            Err(error) => {
                self.audit_warning(
                    AuditEventKind::SignatureRefused,
                    id,
                    Some(signer),
                    error.to_string(),
                )
                .await;
                return Err(error);
            }
        };

        let mut attempt = 0;
        loop {
            let now = self.services.clock.now_ms().await;
            let (mut authorization, version) = self.services.store.load(id).await?;
            if let Err(error) = self.gate_operation(&mut authorization, version, now, signer).await {
                self.audit_warning(
                    AuditEventKind::SignatureRefused,
                    id,
                    Some(signer),
                    error.to_string(),
                )
                .await;
                return Err(error);
            }
            if let Err(error) = Self::require_signing_stage(&authorization) {
                self.audit_warning(
                    AuditEventKind::SignatureRefused,
                    id,
                    Some(signer),
                    error.to_string(),
                )
                .await;
                return Err(error);
            }
            if let Err(error) = custos_signature::record_signature(
                &mut authorization,
                signer,
                key_ref,
                SignatureAlgorithm::Ed25519,
                signature.clone(),
                now,
            ) {
                self.audit_warning(
                    AuditEventKind::SignatureRefused,
                    id,
                    Some(signer),
                    error.to_string(),
                )
                .await;
                return Err(error);
            }
            let status = authorization.status;

            match self.services.store.update(id, version, authorization).await {
                Ok(_) => {
                    self.audit_info(
                        AuditEventKind::SignatureRecorded,
                        id,
                        Some(signer),
                        format!("signature recorded under {key_ref}"),
                    )
                    .await;
                    return Ok(status);
                }
                Err(error) if error.is_retryable() && self.retry.allows_retry(attempt) => {
                    attempt += 1;
                    tokio::time::sleep(self.retry.delay(attempt)).await;
                }
                Err(error) => {
                    self.audit_warning(
                        AuditEventKind::SignatureRefused,
                        id,
                        Some(signer),
                        error.to_string(),
                    )
                    .await;
                    return Err(error);
                }
            }
        }
    }

    /// Verify outstanding signature records
    ///
    /// Public keys are fetched from the vault up front; verification is
    /// per-record and one failure never blocks sibling records. Meeting the
    /// threshold moves the authorization to `Signed`.
    pub async fn verify(&self, id: TransactionId, actor: ActorId) -> CustosResult<VerifyReport> {
        let now = self.services.clock.now_ms().await;
        let (mut snapshot, version) = self.services.store.load(id).await?;
        if let Err(error) = self.gate_operation(&mut snapshot, version, now, actor).await {
            self.audit_warning(
                AuditEventKind::SignatureVerificationFailed,
                id,
                Some(actor),
                error.to_string(),
            )
            .await;
            return Err(error);
        }
        if let Err(error) = Self::require_signing_stage(&snapshot) {
            self.audit_warning(
                AuditEventKind::SignatureVerificationFailed,
                id,
                Some(actor),
                error.to_string(),
            )
            .await;
            return Err(error);
        }

        let message = canonical_intent_hash(&snapshot.intent)?;
        let mut keys = HashMap::new();
        for record in snapshot.signatures.iter().filter(|r| !r.verified) {
            if !keys.contains_key(&record.key_ref) {
                let lookup = self.services.vault.public_key(record.key_ref).await;
                keys.insert(record.key_ref, lookup);
            }
        }

        let mut attempt = 0;
        loop {
            let now = self.services.clock.now_ms().await;
            let (mut authorization, version) = self.services.store.load(id).await?;
            if let Err(error) = self.gate_operation(&mut authorization, version, now, actor).await {
                self.audit_warning(
                    AuditEventKind::SignatureVerificationFailed,
                    id,
                    Some(actor),
                    error.to_string(),
                )
                .await;
                return Err(error);
            }
            Self::require_signing_stage(&authorization)?;

            let outcome = custos_signature::verify_records(&mut authorization, &message, &keys, now);
            let before = authorization.status;
            if custos_signature::threshold_met(&authorization)
                && before == AuthorizationStatus::Approved
            {
                authorization.transition_to(AuthorizationStatus::Signed)?;
            }
            let after = authorization.status;
            let threshold = custos_signature::threshold_met(&authorization);

            // A pass that changed nothing is a pure read; skip the write.
            if !outcome.changed_anything() && after == before {
                self.audit_verify_outcome(id, &outcome).await;
                return Ok(VerifyReport {
                    newly_verified: outcome.newly_verified,
                    failures: outcome.failures,
                    threshold_met: threshold,
                    status: after,
                });
            }

            match self.services.store.update(id, version, authorization).await {
                Ok(_) => {
                    self.audit_verify_outcome(id, &outcome).await;
                    if after != before {
                        self.audit_info(
                            AuditEventKind::StatusChanged,
                            id,
                            Some(actor),
                            format!("{before} -> {after} on signature threshold"),
                        )
                        .await;
                    }
                    return Ok(VerifyReport {
                        newly_verified: outcome.newly_verified,
                        failures: outcome.failures,
                        threshold_met: threshold,
                        status: after,
                    });
                }
                Err(error) if error.is_retryable() && self.retry.allows_retry(attempt) => {
                    attempt += 1;
                    tokio::time::sleep(self.retry.delay(attempt)).await;
                }
                Err(error) => {
                    self.audit_warning(
                        AuditEventKind::SignatureVerificationFailed,
                        id,
                        Some(actor),
                        error.to_string(),
                    )
                    .await;
                    return Err(error);
                }
            }
        }
    }

    /// Execute a signed authorization, exactly once
    ///
    /// Idempotent per transaction id: a repeat call returns the original
    /// result without re-executing.
    pub async fn execute(&self, id: TransactionId, actor: ActorId) -> CustosResult<ExecutionResult> {
        let mut attempt = 0;
        loop {
            let now = self.services.clock.now_ms().await;
            let (mut authorization, version) = self.services.store.load(id).await?;
            if let Some(result) = authorization.execution.clone() {
                return Ok(result);
            }
            if let Err(error) = self.gate_operation(&mut authorization, version, now, actor).await {
                self.audit_warning(
                    AuditEventKind::ExecutionRefused,
                    id,
                    Some(actor),
                    error.to_string(),
                )
                .await;
                return Err(error);
            }
            if authorization.status != AuthorizationStatus::Signed {
                let error = CustosError::threshold_not_met(format!(
                    "{id} is {} with {}/{} verified signatures; execution requires signed",
                    authorization.status,
                    authorization.verified_signer_count(),
                    authorization.policy.required_signatures,
                ));
                self.audit_warning(
                    AuditEventKind::ExecutionRefused,
                    id,
                    Some(actor),
                    error.to_string(),
                )
                .await;
                return Err(error);
            }

            let receipt = hash::to_hex(&canonical_intent_hash(&authorization.intent)?);
            let result = ExecutionResult {
                transaction_id: id,
                executed_at: now,
                receipt,
            };
            authorization.execution = Some(result.clone());
            authorization.transition_to(AuthorizationStatus::Executed)?;

            match self.services.store.update(id, version, authorization).await {
                Ok(_) => {
                    self.audit_info(
                        AuditEventKind::ExecutionCompleted,
                        id,
                        Some(actor),
                        format!("executed at {}", result.executed_at),
                    )
                    .await;
                    self.audit_info(
                        AuditEventKind::StatusChanged,
                        id,
                        Some(actor),
                        "signed -> executed",
                    )
                    .await;
                    return Ok(result);
                }
                // A concurrent `execute` may have won; the reload returns
                // its stored result instead of executing twice.
                Err(error) if error.is_retryable() && self.retry.allows_retry(attempt) => {
                    attempt += 1;
                    tokio::time::sleep(self.retry.delay(attempt)).await;
                }
                Err(error) => {
                    self.audit_warning(
                        AuditEventKind::ExecutionRefused,
                        id,
                        Some(actor),
                        error.to_string(),
                    )
                    .await;
                    return Err(error);
                }
            }
        }
    }

    /// Recompute risk and re-resolve policy for an untouched authorization
    ///
    /// Allowed only while `Pending` with no votes cast; the fresh
    /// assessment supersedes the prior one for policy purposes.
    pub async fn reassess(&self, id: TransactionId, actor: ActorId) -> CustosResult<RiskAssessment> {
        let mut attempt = 0;
        loop {
            let now = self.services.clock.now_ms().await;
            let (mut authorization, version) = self.services.store.load(id).await?;
            self.gate_operation(&mut authorization, version, now, actor).await?;
            if authorization.status != AuthorizationStatus::Pending
                || !authorization.votes.is_empty()
            {
                return Err(CustosError::invalid_intent(format!(
                    "{id} cannot be re-assessed once voting has begun"
                )));
            }

            let assessment = self
                .scorer
                .assess(&authorization.intent, self.services.history.as_ref(), now)
                .await;
            let policy = self.resolver.resolve(
                authorization.intent.kind,
                authorization.intent.amount,
                assessment.score,
            )?;
            let details = format!(
                "score {} -> {}, rule '{}': {} approvals / {} signatures required",
                authorization.assessment.score,
                assessment.score,
                policy.rule_name,
                policy.required_approvals,
                policy.required_signatures,
            );
            authorization.supersede_assessment(assessment.clone(), policy);

            match self.services.store.update(id, version, authorization).await {
                Ok(_) => {
                    self.audit_info(AuditEventKind::RiskReassessed, id, Some(actor), details)
                        .await;
                    return Ok(assessment);
                }
                Err(error) if error.is_retryable() && self.retry.allows_retry(attempt) => {
                    attempt += 1;
                    tokio::time::sleep(self.retry.delay(attempt)).await;
                }
                Err(error) => return Err(error),
            }
        }
    }

    /// Snapshot of the authorization, applying lazy expiry
    ///
    /// Never fails on an expired aggregate: the snapshot comes back with
    /// status `Expired` instead.
    pub async fn status(&self, id: TransactionId) -> CustosResult<TransactionAuthorization> {
        let now = self.services.clock.now_ms().await;
        let (mut authorization, version) = self.services.store.load(id).await?;
        if authorization.is_expired(now) {
            let before = authorization.status;
            authorization.transition_to(AuthorizationStatus::Expired)?;
            // Best effort: a losing race means another writer already
            // observed the expiry.
            let _ = self
                .services
                .store
                .update(id, version, authorization.clone())
                .await;
            self.audit_warning(
                AuditEventKind::StatusChanged,
                id,
                None,
                format!("{before} -> expired (window elapsed)"),
            )
            .await;
        }
        Ok(authorization)
    }

    /// Approve/reject counts from a consistent snapshot
    pub async fn tally(&self, id: TransactionId) -> CustosResult<Tally> {
        let (authorization, _) = self.services.store.load(id).await?;
        Ok(custos_ledger::tally(&authorization))
    }

    /// Whether the signature threshold is met, from a consistent snapshot
    pub async fn threshold_met(&self, id: TransactionId) -> CustosResult<bool> {
        let (authorization, _) = self.services.store.load(id).await?;
        Ok(custos_signature::threshold_met(&authorization))
    }

    /// Proactively flip long-idle authorizations past their window
    ///
    /// Correctness never depends on this sweep — expiry is enforced lazily
    /// on every operation — but flipping idle aggregates keeps status
    /// queries honest for observability.
    pub async fn sweep_expired(&self) -> usize {
        let now = self.services.clock.now_ms().await;
        let mut flipped = 0;
        for id in self.services.store.ids().await {
            let Ok((mut authorization, version)) = self.services.store.load(id).await else {
                continue;
            };
            if !authorization.is_expired(now) {
                continue;
            }
            let before = authorization.status;
            if authorization
                .transition_to(AuthorizationStatus::Expired)
                .is_err()
            {
                continue;
            }
            if self
                .services
                .store
                .update(id, version, authorization)
                .await
                .is_ok()
            {
                flipped += 1;
                self.audit_warning(
                    AuditEventKind::StatusChanged,
                    id,
                    None,
                    format!("{before} -> expired (swept)"),
                )
                .await;
            }
        }
        flipped
    }

    /// Refuse operations on terminal or expired aggregates, flipping
    /// lazily when the window has elapsed
    async fn gate_operation(
        &self,
        authorization: &mut TransactionAuthorization,
        version: Version,
        now: u64,
        actor: ActorId,
    ) -> CustosResult<()> {
        match authorization.status {
            AuthorizationStatus::Expired => Err(CustosError::expired(format!(
                "{} expired at {}",
                authorization.id(),
                authorization.expires_at
            ))),
            AuthorizationStatus::Rejected | AuthorizationStatus::Executed => {
                Err(CustosError::terminal_state(format!(
                    "{} is {} and accepts no further operations",
                    authorization.id(),
                    authorization.status
                )))
            }
            _ if authorization.is_expired(now) => {
                let before = authorization.status;
                authorization.transition_to(AuthorizationStatus::Expired)?;
                // Best effort: losing this race means another writer
                // observed the expiry first.
                let _ = self
                    .services
                    .store
                    .update(authorization.id(), version, authorization.clone())
                    .await;
                self.audit_warning(
                    AuditEventKind::StatusChanged,
                    authorization.id(),
                    Some(actor),
                    format!("{before} -> expired (window elapsed)"),
                )
                .await;
                Err(CustosError::expired(format!(
                    "{} expired at {}",
                    authorization.id(),
                    authorization.expires_at
                )))
            }
            _ => Ok(()),
        }
    }

    /// Signing and verification require the vote threshold to be met
    fn require_signing_stage(authorization: &TransactionAuthorization) -> CustosResult<()> {
        match authorization.status {
            AuthorizationStatus::Approved | AuthorizationStatus::Signed => Ok(()),
            _ => Err(CustosError::threshold_not_met(format!(
                "{} is {}; signatures are accepted once approved",
                authorization.id(),
                authorization.status
            ))),
        }
    }

    async fn audit_verify_outcome(&self, id: TransactionId, outcome: &VerifyOutcome) {
        for signer in &outcome.newly_verified {
            self.audit_info(
                AuditEventKind::SignatureVerified,
                id,
                Some(*signer),
                "signature verified against vault key",
            )
            .await;
        }
        for (signer, error) in &outcome.failures {
            self.audit_warning(
                AuditEventKind::SignatureVerificationFailed,
                id,
                Some(*signer),
                error.to_string(),
            )
            .await;
        }
    }

    async fn audit_info(
        &self,
        kind: AuditEventKind,
        id: TransactionId,
        actor: Option<ActorId>,
        details: impl Into<String>,
    ) {
        self.services
            .audit
            .record(AuditEvent::info(kind, id, actor, details))
            .await;
    }

    async fn audit_warning(
        &self,
        kind: AuditEventKind,
        id: TransactionId,
        actor: Option<ActorId>,
        details: impl Into<String>,
    ) {
        self.services
            .audit
            .record(AuditEvent::warning(kind, id, actor, details))
            .await;
    }
}
