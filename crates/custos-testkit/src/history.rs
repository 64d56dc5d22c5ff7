//! Scriptable history source

use async_trait::async_trait;
use custos_core::{CustosError, CustosResult, HistoryEffects, HistorySnapshot};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

/// History source returning a scripted snapshot, or failing on demand
#[derive(Debug, Default)]
pub struct ScriptedHistory {
    snapshot: Mutex<HistorySnapshot>,
    failing: AtomicBool,
}

impl ScriptedHistory {
    /// History with no prior activity
    pub fn new() -> Self {
        Self::default()
    }

    /// History answering with a fixed snapshot
    pub fn with_snapshot(snapshot: HistorySnapshot) -> Self {
        Self {
            snapshot: Mutex::new(snapshot),
            failing: AtomicBool::new(false),
        }
    }

    /// Replace the scripted snapshot
    pub fn set_snapshot(&self, snapshot: HistorySnapshot) {
        *self.snapshot.lock() = snapshot;
    }

    /// Make lookups fail (or succeed again)
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl HistoryEffects for ScriptedHistory {
    async fn recent_activity(
        &self,
        _source_ref: &str,
        _now_ms: u64,
    ) -> CustosResult<HistorySnapshot> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(CustosError::storage("history backend unavailable"));
        }
        Ok(self.snapshot.lock().clone())
    }
}
