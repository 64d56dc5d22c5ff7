//! Recent-activity history interface for risk scoring
//!
//! The scorer reads a bounded snapshot of the source's recent activity.
//! Lookups are fallible; the scorer degrades to locally available factors
//! when the snapshot cannot be produced and never blocks intake.

use crate::errors::CustosResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Read-only view of a source's recent transaction activity
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistorySnapshot {
    /// Destinations this source has previously sent to
    pub known_destinations: BTreeSet<String>,
    /// Unix-millisecond timestamps of the source's recent transactions
    pub recent_transaction_times: Vec<u64>,
}

impl HistorySnapshot {
    /// A snapshot with no prior activity
    pub fn empty() -> Self {
        Self::default()
    }

    /// Count of transactions within the trailing window ending at `now_ms`
    pub fn transactions_within(&self, window_ms: u64, now_ms: u64) -> usize {
        self.recent_transaction_times
            .iter()
            .filter(|&&t| t <= now_ms && now_ms.saturating_sub(t) <= window_ms)
            .count()
    }
}

/// History lookups for risk scoring
#[async_trait]
pub trait HistoryEffects: Send + Sync {
    /// Snapshot the source's recent activity as of `now_ms`
    async fn recent_activity(&self, source_ref: &str, now_ms: u64) -> CustosResult<HistorySnapshot>;
}

#[async_trait]
impl<T: HistoryEffects + ?Sized> HistoryEffects for Arc<T> {
    async fn recent_activity(&self, source_ref: &str, now_ms: u64) -> CustosResult<HistorySnapshot> {
        (**self).recent_activity(source_ref, now_ms).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transactions_within_window() {
        let snapshot = HistorySnapshot {
            known_destinations: BTreeSet::new(),
            recent_transaction_times: vec![1_000, 2_000, 10_000, 4_000_000],
        };
        // Window of 3_600_000 ms ending at 3_600_000: includes 1_000..=3_600_000.
        assert_eq!(snapshot.transactions_within(3_600_000, 3_600_000), 3);
        // Timestamps after `now` are not counted.
        assert_eq!(snapshot.transactions_within(3_600_000, 2_500), 2);
    }
}
