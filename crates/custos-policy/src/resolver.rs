//! Deterministic policy resolution

use crate::rules::{PolicyRule, PolicyRuleSet};
use custos_core::{ApprovalPolicy, CustosError, CustosResult, TransactionKind};
use rust_decimal::Decimal;

/// Resolves `(kind, amount, score)` to an [`ApprovalPolicy`]
///
/// Holds one validated, immutable rule set for its whole lifetime;
/// swapping rules means building a new resolver.
#[derive(Debug, Clone)]
pub struct PolicyResolver {
    ruleset: PolicyRuleSet,
}

impl PolicyResolver {
    /// Build a resolver over a validated rule set
    pub fn new(ruleset: PolicyRuleSet) -> CustosResult<Self> {
        ruleset.validate()?;
        Ok(Self { ruleset })
    }

    /// Resolver over the builtin default rules
    pub fn builtin() -> Self {
        Self {
            ruleset: PolicyRuleSet::builtin(),
        }
    }

    /// The rule set version in use
    pub fn version(&self) -> u32 {
        self.ruleset.version
    }

    /// Resolve the approval policy for a transaction
    ///
    /// Matching rules compete; the highest `base_approvals` wins. Risk
    /// add-ons then raise the requirement: +2 above the high-risk cutoff,
    /// +1 more above the critical cutoff, capped at the configured
    /// maximum. Signatures track the final approval count unless the rule
    /// decouples them, and never exceed it.
    pub fn resolve(
        &self,
        kind: TransactionKind,
        amount: Decimal,
        score: u8,
    ) -> CustosResult<ApprovalPolicy> {
        let rule = self
            .ruleset
            .rules
            .iter()
            .filter(|rule| rule.matches(kind, amount))
            .max_by_key(|rule| rule.base_approvals)
            .ok_or_else(|| {
                CustosError::policy_not_found(format!(
                    "no rule covers {kind} of {amount} (rule set v{})",
                    self.ruleset.version
                ))
            })?;

        let required_approvals = self.approvals_with_addons(rule, score);
        let required_signatures = rule
            .required_signatures
            .unwrap_or(required_approvals)
            .min(required_approvals);

        let policy = ApprovalPolicy {
            required_approvals,
            required_signatures,
            eligible_roles: rule.eligible_roles.clone(),
            expiry_window_ms: rule.expiry_window_secs.saturating_mul(1_000),
            veto_on_reject: rule.veto_on_reject,
            rule_name: rule.name.clone(),
            ruleset_version: self.ruleset.version,
        };
        tracing::debug!(
            rule = %policy.rule_name,
            %kind,
            %amount,
            score,
            required_approvals = policy.required_approvals,
            required_signatures = policy.required_signatures,
            "policy resolved"
        );
        Ok(policy)
    }

    fn approvals_with_addons(&self, rule: &PolicyRule, score: u8) -> u8 {
        let mut approvals = rule.base_approvals;
        if score > self.ruleset.high_risk_cutoff {
            approvals = approvals.saturating_add(2);
        }
        if score > self.ruleset.critical_risk_cutoff {
            approvals = approvals.saturating_add(1);
        }
        approvals.min(self.ruleset.max_approvals)
    }
}
