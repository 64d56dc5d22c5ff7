//! Versioned policy rule configuration
//!
//! Rules are loaded once — from the builtin defaults or a TOML document —
//! validated, and treated as read-only thereafter. Threshold caps are
//! configuration data, not code.

use custos_core::{CustosError, CustosResult, Role, TransactionKind};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

fn default_high_risk_cutoff() -> u8 {
    60
}

fn default_critical_risk_cutoff() -> u8 {
    80
}

fn default_max_approvals() -> u8 {
    5
}

/// One policy rule: an amount band for a set of transaction kinds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyRule {
    /// Rule name, carried into the resolved policy for the audit trail
    pub name: String,
    /// Transaction kinds this rule applies to; empty means all kinds
    #[serde(default)]
    pub kinds: Vec<TransactionKind>,
    /// Inclusive lower bound of the amount band
    #[serde(default)]
    pub min_amount: Decimal,
    /// Exclusive upper bound of the amount band; `None` means unbounded
    #[serde(default)]
    pub max_amount: Option<Decimal>,
    /// Approvals required before any risk add-ons
    pub base_approvals: u8,
    /// Decoupled signature requirement; `None` tracks the final approval
    /// count
    #[serde(default)]
    pub required_signatures: Option<u8>,
    /// Roles whose holders may vote under this rule
    pub eligible_roles: BTreeSet<Role>,
    /// Authorization lifetime in seconds
    pub expiry_window_secs: u64,
    /// Whether one reject vote vetoes the transaction outright
    #[serde(default)]
    pub veto_on_reject: bool,
}

impl PolicyRule {
    /// Whether this rule covers the given kind and amount
    pub fn matches(&self, kind: TransactionKind, amount: Decimal) -> bool {
        let kind_matches = self.kinds.is_empty() || self.kinds.contains(&kind);
        let above_min = amount >= self.min_amount;
        let below_max = self.max_amount.map_or(true, |max| amount < max);
        kind_matches && above_min && below_max
    }
}

/// The versioned, immutable set of policy rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyRuleSet {
    /// Rule set version, carried into every resolved policy
    pub version: u32,
    /// Scores above this add two approvals
    #[serde(default = "default_high_risk_cutoff")]
    pub high_risk_cutoff: u8,
    /// Scores above this add one further approval
    #[serde(default = "default_critical_risk_cutoff")]
    pub critical_risk_cutoff: u8,
    /// Upper bound on required approvals after add-ons
    #[serde(default = "default_max_approvals")]
    pub max_approvals: u8,
    /// The rules, checked in order for matches
    pub rules: Vec<PolicyRule>,
}

impl PolicyRuleSet {
    /// The builtin default rule set
    ///
    /// One catch-all band per deployment: base of one approval, treasury
    /// and security roles eligible, 24-hour window. Risk add-ons do the
    /// scaling.
    pub fn builtin() -> Self {
        let eligible_roles: BTreeSet<Role> = [Role::new("treasury"), Role::new("security")]
            .into_iter()
            .collect();
        Self {
            version: 1,
            high_risk_cutoff: default_high_risk_cutoff(),
            critical_risk_cutoff: default_critical_risk_cutoff(),
            max_approvals: default_max_approvals(),
            rules: vec![PolicyRule {
                name: "default".to_string(),
                kinds: Vec::new(),
                min_amount: Decimal::ZERO,
                max_amount: None,
                base_approvals: 1,
                required_signatures: None,
                eligible_roles,
                expiry_window_secs: 86_400,
                veto_on_reject: false,
            }],
        }
    }

    /// Parse and validate a rule set from a TOML document
    pub fn from_toml_str(document: &str) -> CustosResult<Self> {
        let ruleset: Self = toml::from_str(document)
            .map_err(|e| CustosError::policy_not_found(format!("rule set parse failed: {e}")))?;
        ruleset.validate()?;
        Ok(ruleset)
    }

    /// Check the rule set's internal consistency
    pub fn validate(&self) -> CustosResult<()> {
        if self.rules.is_empty() {
            return Err(CustosError::policy_not_found("rule set has no rules"));
        }
        if self.high_risk_cutoff >= self.critical_risk_cutoff {
            return Err(CustosError::policy_not_found(format!(
                "high-risk cutoff {} must be below critical cutoff {}",
                self.high_risk_cutoff, self.critical_risk_cutoff
            )));
        }
        for rule in &self.rules {
            if rule.base_approvals < 1 {
                return Err(CustosError::policy_not_found(format!(
                    "rule '{}' requires at least one base approval",
                    rule.name
                )));
            }
            if rule.eligible_roles.is_empty() {
                return Err(CustosError::policy_not_found(format!(
                    "rule '{}' names no eligible roles",
                    rule.name
                )));
            }
            if rule.expiry_window_secs == 0 {
                return Err(CustosError::policy_not_found(format!(
                    "rule '{}' has a zero expiry window",
                    rule.name
                )));
            }
            if let Some(max) = rule.max_amount {
                if max <= rule.min_amount {
                    return Err(CustosError::policy_not_found(format!(
                        "rule '{}' has an empty amount band",
                        rule.name
                    )));
                }
            }
        }
        Ok(())
    }
}
