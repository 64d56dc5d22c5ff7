//! Scoring thresholds
//!
//! All tunables live here so the weights in the scorer stay fixed and the
//! deployment decides where the amount bands and business hours sit.

use rust_decimal::Decimal;

/// Thresholds and windows for risk scoring
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RiskConfig {
    /// Amounts above this earn the mid amount contribution
    pub mid_amount: Decimal,
    /// Amounts above this earn the full amount contribution
    pub high_amount: Decimal,
    /// Inclusive local business hours; activity outside them is flagged
    pub business_hours: (u32, u32),
    /// Offset applied to UTC to derive the business-local hour
    pub utc_offset_hours: i8,
    /// More than this many transactions in the trailing window flags velocity
    pub velocity_limit: usize,
    /// Trailing window for the velocity check, in milliseconds
    pub velocity_window_ms: u64,
    /// Contribution applied instead of the history-derived factors when the
    /// history lookup fails; fail toward scrutiny, never toward silence
    pub history_unavailable_contribution: u8,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            mid_amount: Decimal::from(10_000),
            high_amount: Decimal::from(50_000),
            business_hours: (9, 17),
            utc_offset_hours: 0,
            velocity_limit: 3,
            velocity_window_ms: 3_600_000,
            history_unavailable_contribution: 20,
        }
    }
}
