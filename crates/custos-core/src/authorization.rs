//! The `TransactionAuthorization` aggregate and its status machine
//!
//! The aggregate binds one intent to its risk assessment, resolved policy,
//! votes, and signature records. It is mutated only through orchestrator
//! operations, and every status transition is one-directional.

use crate::errors::{CustosError, CustosResult};
use crate::identifiers::{ActorId, TransactionId};
use crate::intent::TransactionIntent;
use crate::policy::ApprovalPolicy;
use crate::risk::RiskAssessment;
use crate::signature::SignatureRecord;
use crate::votes::ApprovalVote;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of an authorization
///
/// `Pending → Approved → Signed → Executed`; `Pending`/`Approved` may fall
/// to `Rejected`; any state short of `Signed` may fall to `Expired`.
/// `Executed`, `Rejected`, and `Expired` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorizationStatus {
    /// Collecting approval votes
    Pending,
    /// Vote threshold met; collecting signatures
    Approved,
    /// Signature threshold met; ready to execute
    Signed,
    /// Executed exactly once (terminal)
    Executed,
    /// Rejected by veto or vote arithmetic (terminal)
    Rejected,
    /// Expiry window elapsed before signing completed (terminal)
    Expired,
}

impl AuthorizationStatus {
    /// Whether no further transitions are possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Executed | Self::Rejected | Self::Expired)
    }

    /// Forward-only transition table
    pub fn can_transition_to(&self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Approved)
                | (Self::Pending, Self::Rejected)
                | (Self::Pending, Self::Expired)
                | (Self::Approved, Self::Signed)
                | (Self::Approved, Self::Rejected)
                | (Self::Approved, Self::Expired)
                | (Self::Signed, Self::Executed)
        )
    }
}

impl fmt::Display for AuthorizationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Signed => "signed",
            Self::Executed => "executed",
            Self::Rejected => "rejected",
            Self::Expired => "expired",
        };
        write!(f, "{name}")
    }
}

/// Result of the one-time execution of an authorization
///
/// Returned unchanged by every later `execute` call on the same
/// transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// The executed transaction
    pub transaction_id: TransactionId,
    /// Unix milliseconds of the first (only) execution
    pub executed_at: u64,
    /// Hex digest of the canonical intent, handed to downstream settlement
    pub receipt: String,
}

/// Aggregate root for one transaction's authorization lifecycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionAuthorization {
    /// The immutable proposed action
    pub intent: TransactionIntent,
    /// Current risk assessment (latest wins for policy purposes)
    pub assessment: RiskAssessment,
    /// Earlier assessments kept for the audit trail
    pub superseded_assessments: Vec<RiskAssessment>,
    /// The resolved policy governing this authorization
    pub policy: ApprovalPolicy,
    /// Votes cast so far, one per approver
    pub votes: Vec<ApprovalVote>,
    /// Signature records, one per signer
    pub signatures: Vec<SignatureRecord>,
    /// Lifecycle state
    pub status: AuthorizationStatus,
    /// Unix milliseconds at creation
    pub created_at: u64,
    /// Unix milliseconds after which the authorization expires
    pub expires_at: u64,
    /// Set exactly once by `execute`
    pub execution: Option<ExecutionResult>,
}

impl TransactionAuthorization {
    /// Create a fresh `Pending` aggregate
    pub fn new(
        intent: TransactionIntent,
        assessment: RiskAssessment,
        policy: ApprovalPolicy,
        now_ms: u64,
    ) -> Self {
        let expires_at = now_ms.saturating_add(policy.expiry_window_ms);
        Self {
            intent,
            assessment,
            superseded_assessments: Vec::new(),
            policy,
            votes: Vec::new(),
            signatures: Vec::new(),
            status: AuthorizationStatus::Pending,
            created_at: now_ms,
            expires_at,
            execution: None,
        }
    }

    /// The aggregate's transaction id
    pub fn id(&self) -> TransactionId {
        self.intent.id
    }

    /// The vote cast by `approver`, if any
    pub fn vote_by(&self, approver: ActorId) -> Option<&ApprovalVote> {
        self.votes.iter().find(|v| v.approver == approver)
    }

    /// The signature record contributed by `signer`, if any
    pub fn signature_by(&self, signer: ActorId) -> Option<&SignatureRecord> {
        self.signatures.iter().find(|s| s.signer == signer)
    }

    /// Count of distinct signers with a verified record
    ///
    /// Records are unique per signer, so counting verified records counts
    /// distinct signers.
    pub fn verified_signer_count(&self) -> usize {
        self.signatures.iter().filter(|s| s.verified).count()
    }

    /// Whether the expiry window has elapsed while short of `Signed`
    ///
    /// An authorization that reached `Signed` before its window closed may
    /// still be executed; terminal states never re-expire.
    pub fn is_expired(&self, now_ms: u64) -> bool {
        matches!(
            self.status,
            AuthorizationStatus::Pending | AuthorizationStatus::Approved
        ) && now_ms > self.expires_at
    }

    /// Apply a status transition, enforcing the forward-only table
    pub fn transition_to(&mut self, next: AuthorizationStatus) -> CustosResult<()> {
        if !self.status.can_transition_to(next) {
            if self.status.is_terminal() {
                return Err(CustosError::terminal_state(format!(
                    "{} is {} and accepts no further transitions",
                    self.id(),
                    self.status
                )));
            }
            return Err(CustosError::internal(format!(
                "illegal transition {} -> {next} for {}",
                self.status,
                self.id()
            )));
        }
        self.status = next;
        Ok(())
    }

    /// Replace the current assessment and policy after re-scoring
    ///
    /// Only legal while `Pending` with no votes cast; the orchestrator
    /// enforces that precondition. The expiry window is re-anchored at the
    /// original creation time.
    pub fn supersede_assessment(&mut self, assessment: RiskAssessment, policy: ApprovalPolicy) {
        let prior = std::mem::replace(&mut self.assessment, assessment);
        self.superseded_assessments.push(prior);
        self.expires_at = self.created_at.saturating_add(policy.expiry_window_ms);
        self.policy = policy;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identifiers::Role;
    use crate::intent::TransactionKind;
    use rust_decimal::Decimal;

    fn authorization() -> TransactionAuthorization {
        let intent = TransactionIntent::new(
            TransactionKind::Withdrawal,
            Decimal::from(5_000),
            "wallet:ops",
            "addr:bc1q9yv",
            "BTC",
            "operations payout",
        )
        .unwrap();
        let assessment = RiskAssessment::from_factors(Vec::new(), 1_000);
        let policy = ApprovalPolicy {
            required_approvals: 1,
            required_signatures: 1,
            eligible_roles: [Role::new("treasury")].into_iter().collect(),
            expiry_window_ms: 86_400_000,
            veto_on_reject: false,
            rule_name: "default".to_string(),
            ruleset_version: 1,
        };
        TransactionAuthorization::new(intent, assessment, policy, 1_000)
    }

    #[test]
    fn test_forward_transitions_only() {
        use AuthorizationStatus::*;
        assert!(Pending.can_transition_to(Approved));
        assert!(Approved.can_transition_to(Signed));
        assert!(Signed.can_transition_to(Executed));
        assert!(Pending.can_transition_to(Rejected));
        assert!(Approved.can_transition_to(Expired));

        assert!(!Approved.can_transition_to(Pending));
        assert!(!Signed.can_transition_to(Approved));
        assert!(!Signed.can_transition_to(Expired));
        assert!(!Executed.can_transition_to(Pending));
        assert!(!Rejected.can_transition_to(Approved));
        assert!(!Expired.can_transition_to(Pending));
    }

    #[test]
    fn test_terminal_states() {
        use AuthorizationStatus::*;
        assert!(Executed.is_terminal());
        assert!(Rejected.is_terminal());
        assert!(Expired.is_terminal());
        assert!(!Pending.is_terminal());
        assert!(!Approved.is_terminal());
        assert!(!Signed.is_terminal());
    }

    #[test]
    fn test_transition_from_terminal_is_refused() {
        let mut auth = authorization();
        auth.transition_to(AuthorizationStatus::Rejected).unwrap();
        let err = auth
            .transition_to(AuthorizationStatus::Approved)
            .unwrap_err();
        assert!(matches!(err, CustosError::TerminalState { .. }));
    }

    #[test]
    fn test_expiry_only_short_of_signed() {
        let mut auth = authorization();
        let past_window = auth.expires_at + 1;
        assert!(auth.is_expired(past_window));

        auth.transition_to(AuthorizationStatus::Approved).unwrap();
        assert!(auth.is_expired(past_window));

        auth.transition_to(AuthorizationStatus::Signed).unwrap();
        assert!(!auth.is_expired(past_window));
    }

    #[test]
    fn test_supersede_assessment_keeps_history() {
        let mut auth = authorization();
        let original_score = auth.assessment.score;
        let newer = RiskAssessment::from_factors(Vec::new(), 2_000);
        let policy = auth.policy.clone();
        auth.supersede_assessment(newer, policy);

        assert_eq!(auth.superseded_assessments.len(), 1);
        assert_eq!(auth.superseded_assessments[0].score, original_score);
        assert_eq!(auth.assessment.computed_at, 2_000);
    }
}
