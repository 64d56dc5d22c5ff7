//! Policy resolution for transaction authorizations
//!
//! One versioned, immutable rule set is the single source of truth for
//! approval and signature thresholds. Resolution is a deterministic lookup
//! over `(kind, amount, risk score)`; when several rules match, the one
//! demanding the most approvals wins — fail toward more scrutiny, never
//! less.

#![forbid(unsafe_code)]

mod resolver;
mod rules;

pub use resolver::PolicyResolver;
pub use rules::{PolicyRule, PolicyRuleSet};
