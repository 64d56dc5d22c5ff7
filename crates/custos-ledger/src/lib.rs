//! Approval vote ledger
//!
//! Pure vote logic over the authorization aggregate: one vote per approver,
//! eligibility by role, and verdict derivation from the tally. The
//! orchestrator applies these functions inside the per-transaction
//! exclusivity boundary, so the one-vote invariant holds under concurrent
//! casting: a conflicting writer loses the version race, re-reads, and
//! then sees the duplicate.

#![forbid(unsafe_code)]

use custos_core::{
    ActorId, ApprovalPolicy, ApprovalVote, CustosError, CustosResult, Role,
    TransactionAuthorization, VoteDecision,
};
use serde::{Deserialize, Serialize};

/// Approve/reject counts for one authorization
///
/// A pure function of the stored votes; no side effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    /// Approve votes cast
    pub approvals: usize,
    /// Reject votes cast
    pub rejections: usize,
}

impl Tally {
    /// Total votes cast
    pub fn total(&self) -> usize {
        self.approvals + self.rejections
    }
}

/// Vote-derived outcome for one authorization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteVerdict {
    /// Still collecting votes
    Open,
    /// The approval threshold is met
    Approved,
    /// Approval has become impossible, or a veto fired
    Rejected,
}

/// Count the votes on an authorization
pub fn tally(authorization: &TransactionAuthorization) -> Tally {
    let approvals = authorization
        .votes
        .iter()
        .filter(|v| v.decision == VoteDecision::Approve)
        .count();
    Tally {
        approvals,
        rejections: authorization.votes.len() - approvals,
    }
}

/// Derive the verdict from a tally
///
/// `eligible_pool` is the roster count of actors holding an eligible role.
/// Rejection fires when the rule vetoes on any reject, or when the uncast
/// eligible votes can no longer lift the approvals to the requirement.
pub fn verdict(tally: &Tally, policy: &ApprovalPolicy, eligible_pool: usize) -> VoteVerdict {
    // An explicit veto outranks a met approval threshold: the state machine
    // allows approved -> rejected until signing completes.
    if policy.veto_on_reject && tally.rejections > 0 {
        return VoteVerdict::Rejected;
    }
    if tally.approvals >= usize::from(policy.required_approvals) {
        return VoteVerdict::Approved;
    }
    let uncast = eligible_pool.saturating_sub(tally.total());
    if tally.approvals + uncast < usize::from(policy.required_approvals) {
        return VoteVerdict::Rejected;
    }
    VoteVerdict::Open
}

/// Append a vote to the authorization
///
/// Fails with `NotEligible` when the approver's role is absent from the
/// policy's eligible set, and with `DuplicateVote` when the approver has
/// already voted. Votes are final once appended. Status and expiry gating
/// belong to the orchestrator.
pub fn cast_vote(
    authorization: &mut TransactionAuthorization,
    approver: ActorId,
    role: Option<Role>,
    decision: VoteDecision,
    comment: Option<String>,
    now_ms: u64,
) -> CustosResult<()> {
    let role = role.ok_or_else(|| {
        CustosError::not_eligible(format!("{approver} is not in the actor directory"))
    })?;
    if !authorization.policy.eligible_roles.contains(&role) {
        return Err(CustosError::not_eligible(format!(
            "role '{role}' of {approver} may not vote on {}",
            authorization.id()
        )));
    }
    if authorization.vote_by(approver).is_some() {
        return Err(CustosError::duplicate_vote(format!(
            "{approver} already voted on {}",
            authorization.id()
        )));
    }

    authorization.votes.push(ApprovalVote {
        approver,
        decision,
        cast_at: now_ms,
        comment,
    });
    tracing::debug!(
        transaction_id = %authorization.id(),
        %approver,
        %decision,
        votes = authorization.votes.len(),
        "vote appended"
    );
    Ok(())
}
