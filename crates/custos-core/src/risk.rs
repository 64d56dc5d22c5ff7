//! Risk assessment types
//!
//! A `RiskAssessment` is created once per scoring pass and never mutated.
//! Re-assessment produces a new value that supersedes the prior one for
//! policy purposes; superseded assessments stay on the aggregate for the
//! audit trail.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Named contributor to a risk score
///
/// Factor names are stable identifiers recorded for auditability; an
/// assessment can always explain its score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskFactorKind {
    /// Amount crossed a configured threshold
    Amount,
    /// Destination unseen in the source's history
    DestinationNovelty,
    /// Local hour outside business hours
    TimeOfDay,
    /// Transaction velocity above the configured limit
    Velocity,
    /// History lookup failed; conservative stand-in applied
    HistoryUnavailable,
}

impl RiskFactorKind {
    /// Stable snake_case name for audit records
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Amount => "amount",
            Self::DestinationNovelty => "destination_novelty",
            Self::TimeOfDay => "time_of_day",
            Self::Velocity => "velocity",
            Self::HistoryUnavailable => "history_unavailable",
        }
    }
}

impl fmt::Display for RiskFactorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One factor's contribution to a score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskFactor {
    /// Which factor fired
    pub kind: RiskFactorKind,
    /// Points contributed, already clamped to the factor's cap
    pub contribution: u8,
}

/// A bounded, explainable risk estimate for one transaction intent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Final score, clamped to 0..=100
    pub score: u8,
    /// Ordered factors that produced the score
    pub factors: Vec<RiskFactor>,
    /// Unix milliseconds at computation time
    pub computed_at: u64,
}

impl RiskAssessment {
    /// Maximum possible score
    pub const MAX_SCORE: u8 = 100;

    /// Build an assessment from factors, clamping the sum to the bound
    pub fn from_factors(factors: Vec<RiskFactor>, computed_at: u64) -> Self {
        let total: u32 = factors.iter().map(|f| u32::from(f.contribution)).sum();
        let score = total.min(u32::from(Self::MAX_SCORE)) as u8;
        Self {
            score,
            factors,
            computed_at,
        }
    }

    /// Whether a given factor contributed to this assessment
    pub fn has_factor(&self, kind: RiskFactorKind) -> bool {
        self.factors.iter().any(|f| f.kind == kind)
    }
}
