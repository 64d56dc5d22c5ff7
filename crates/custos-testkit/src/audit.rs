//! Capturing audit log

use async_trait::async_trait;
use custos_core::{AuditEffects, AuditEvent, AuditEventKind};
use parking_lot::Mutex;

/// Audit handler that captures events for assertions
#[derive(Debug, Default)]
pub struct MemoryAuditLog {
    events: Mutex<Vec<AuditEvent>>,
}

impl MemoryAuditLog {
    /// Create an empty capturing log
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.lock().clone()
    }

    /// Count of recorded events of one kind
    pub fn count_of(&self, kind: AuditEventKind) -> usize {
        self.events.lock().iter().filter(|e| e.kind == kind).count()
    }

    /// Drop everything recorded so far
    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

#[async_trait]
impl AuditEffects for MemoryAuditLog {
    async fn record(&self, event: AuditEvent) {
        self.events.lock().push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use custos_core::TransactionId;

    #[tokio::test]
    async fn test_events_are_captured_in_order() {
        let log = MemoryAuditLog::new();
        let id = TransactionId::new();
        log.record(AuditEvent::info(
            AuditEventKind::AuthorizationInitiated,
            id,
            None,
            "first",
        ))
        .await;
        log.record(AuditEvent::info(AuditEventKind::VoteCast, id, None, "second"))
            .await;

        let events = log.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].kind, AuditEventKind::AuthorizationInitiated);
        assert_eq!(log.count_of(AuditEventKind::VoteCast), 1);
    }
}
