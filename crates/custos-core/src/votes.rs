//! Approval votes
//!
//! One vote per (transaction, approver); votes are final once cast. The
//! uniqueness invariant is enforced by the Approval Ledger inside the
//! per-transaction exclusivity boundary.

use crate::identifiers::ActorId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An approver's business decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteDecision {
    /// Sign-off on the transaction
    Approve,
    /// Refusal, with a reason in the vote comment
    Reject,
}

impl fmt::Display for VoteDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Approve => write!(f, "approve"),
            Self::Reject => write!(f, "reject"),
        }
    }
}

/// An immutable vote cast by an eligible approver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalVote {
    /// Who cast the vote
    pub approver: ActorId,
    /// The decision
    pub decision: VoteDecision,
    /// Unix milliseconds at cast time
    pub cast_at: u64,
    /// Optional comment; rejections carry the refusal reason here
    pub comment: Option<String>,
}
