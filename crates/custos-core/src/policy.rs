//! Resolved approval policy
//!
//! An `ApprovalPolicy` is derived deterministically from (kind, amount,
//! score) by the Policy Resolver and is immutable once attached to an
//! authorization. It is the single source of truth for both the business
//! approval threshold and the cryptographic signature threshold.

use crate::identifiers::Role;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Thresholds and constraints governing one authorization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalPolicy {
    /// Approval votes required before the transaction is business-approved
    pub required_approvals: u8,
    /// Verified signatures required before the transaction is
    /// cryptographically authorized; never exceeds `required_approvals`
    pub required_signatures: u8,
    /// Roles whose holders may vote
    pub eligible_roles: BTreeSet<Role>,
    /// Authorization lifetime from creation, in milliseconds
    pub expiry_window_ms: u64,
    /// Whether a single reject vote vetoes the transaction outright
    pub veto_on_reject: bool,
    /// Name of the rule that produced this policy
    pub rule_name: String,
    /// Version of the rule set that produced this policy
    pub ruleset_version: u32,
}

impl ApprovalPolicy {
    /// Internal consistency of the resolved thresholds
    pub fn is_well_formed(&self) -> bool {
        self.required_approvals >= 1
            && self.required_signatures <= self.required_approvals
            && !self.eligible_roles.is_empty()
            && self.expiry_window_ms > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(approvals: u8, signatures: u8) -> ApprovalPolicy {
        ApprovalPolicy {
            required_approvals: approvals,
            required_signatures: signatures,
            eligible_roles: [Role::new("treasury")].into_iter().collect(),
            expiry_window_ms: 86_400_000,
            veto_on_reject: false,
            rule_name: "default".to_string(),
            ruleset_version: 1,
        }
    }

    #[test]
    fn test_well_formed_policy() {
        assert!(policy(2, 2).is_well_formed());
        assert!(policy(3, 1).is_well_formed());
    }

    #[test]
    fn test_signatures_cannot_exceed_approvals() {
        assert!(!policy(1, 2).is_well_formed());
    }

    #[test]
    fn test_zero_approvals_is_malformed() {
        assert!(!policy(0, 0).is_well_formed());
    }
}
