//! Weighted, capped risk scoring

use crate::config::RiskConfig;
use chrono::{DateTime, Timelike, Utc};
use custos_core::{
    HistoryEffects, HistorySnapshot, RiskAssessment, RiskFactor, RiskFactorKind, TransactionIntent,
};

/// Cap for the amount factor
pub const AMOUNT_CAP: u8 = 40;
/// Cap for the destination-novelty factor
pub const NOVELTY_CAP: u8 = 20;
/// Cap for the time-of-day factor
pub const TIME_OF_DAY_CAP: u8 = 10;
/// Cap for the velocity factor
pub const VELOCITY_CAP: u8 = 15;

/// Computes a [`RiskAssessment`] for a transaction intent
///
/// Constructor-injected service; holds only its configuration.
#[derive(Debug, Clone, Default)]
pub struct RiskScorer {
    config: RiskConfig,
}

impl RiskScorer {
    /// Build a scorer with the given thresholds
    pub fn new(config: RiskConfig) -> Self {
        Self { config }
    }

    /// The active configuration
    pub fn config(&self) -> &RiskConfig {
        &self.config
    }

    /// Score an intent, reading recent activity through `history`
    ///
    /// A failed history lookup never propagates: the scorer falls back to
    /// locally available factors plus the `history_unavailable` stand-in.
    pub async fn assess(
        &self,
        intent: &TransactionIntent,
        history: &dyn HistoryEffects,
        now_ms: u64,
    ) -> RiskAssessment {
        let snapshot = match history.recent_activity(&intent.source_ref, now_ms).await {
            Ok(snapshot) => Some(snapshot),
            Err(error) => {
                tracing::warn!(
                    transaction_id = %intent.id,
                    source = %intent.source_ref,
                    %error,
                    "history lookup failed; scoring with local factors only"
                );
                None
            }
        };
        self.assess_with_snapshot(intent, snapshot.as_ref(), now_ms)
    }

    /// Score an intent against an already-fetched snapshot
    ///
    /// `None` means the history lookup failed. Pure and deterministic:
    /// identical inputs always produce the identical assessment.
    pub fn assess_with_snapshot(
        &self,
        intent: &TransactionIntent,
        snapshot: Option<&HistorySnapshot>,
        now_ms: u64,
    ) -> RiskAssessment {
        let mut factors = Vec::new();

        let amount_points = if intent.amount > self.config.high_amount {
            AMOUNT_CAP
        } else if intent.amount > self.config.mid_amount {
            20
        } else {
            0
        };
        push_factor(&mut factors, RiskFactorKind::Amount, amount_points, AMOUNT_CAP);

        let time_points = if self.is_outside_business_hours(now_ms) {
            TIME_OF_DAY_CAP
        } else {
            0
        };
        push_factor(&mut factors, RiskFactorKind::TimeOfDay, time_points, TIME_OF_DAY_CAP);

        match snapshot {
            Some(snapshot) => {
                let novelty_points = if snapshot.known_destinations.contains(&intent.destination_ref)
                {
                    0
                } else {
                    NOVELTY_CAP
                };
                push_factor(
                    &mut factors,
                    RiskFactorKind::DestinationNovelty,
                    novelty_points,
                    NOVELTY_CAP,
                );

                let recent =
                    snapshot.transactions_within(self.config.velocity_window_ms, now_ms);
                let velocity_points = if recent > self.config.velocity_limit {
                    VELOCITY_CAP
                } else {
                    0
                };
                push_factor(&mut factors, RiskFactorKind::Velocity, velocity_points, VELOCITY_CAP);
            }
            None => {
                push_factor(
                    &mut factors,
                    RiskFactorKind::HistoryUnavailable,
                    self.config.history_unavailable_contribution,
                    RiskAssessment::MAX_SCORE,
                );
            }
        }

        let assessment = RiskAssessment::from_factors(factors, now_ms);
        tracing::debug!(
            transaction_id = %intent.id,
            score = assessment.score,
            factor_count = assessment.factors.len(),
            "risk assessment computed"
        );
        assessment
    }

    /// Whether the business-local hour falls outside the configured hours
    ///
    /// An unrepresentable timestamp counts as outside: fail toward scrutiny.
    fn is_outside_business_hours(&self, now_ms: u64) -> bool {
        let offset_ms = i64::from(self.config.utc_offset_hours) * 3_600_000;
        let shifted = match i64::try_from(now_ms) {
            Ok(ms) => ms.saturating_add(offset_ms),
            Err(_) => return true,
        };
        match DateTime::<Utc>::from_timestamp_millis(shifted) {
            Some(local) => {
                let hour = local.hour();
                let (open, close) = self.config.business_hours;
                hour < open || hour > close
            }
            None => true,
        }
    }
}

/// Record a factor only when it fires, clamped to its cap
fn push_factor(factors: &mut Vec<RiskFactor>, kind: RiskFactorKind, points: u8, cap: u8) {
    let contribution = points.min(cap);
    if contribution > 0 {
        factors.push(RiskFactor { kind, contribution });
    }
}
