//! Structured-log audit handler
//!
//! Emits every audit event as a structured `tracing` event. Where the
//! decision trail ultimately lands is the subscriber's concern; the
//! pipeline never waits on it and never sees a logging failure.

use async_trait::async_trait;
use custos_core::{AuditEffects, AuditEvent, AuditSeverity};

/// Audit handler writing to the active `tracing` subscriber
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditLog;

impl TracingAuditLog {
    /// Create a new tracing audit handler
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AuditEffects for TracingAuditLog {
    async fn record(&self, event: AuditEvent) {
        let transaction = event
            .transaction_id
            .map(|id| id.to_string())
            .unwrap_or_default();
        let actor = event.actor.map(|id| id.to_string()).unwrap_or_default();
        match event.severity {
            AuditSeverity::Info => tracing::info!(
                target: "custos::audit",
                kind = %event.kind,
                transaction_id = %transaction,
                actor = %actor,
                details = %event.details,
                "audit"
            ),
            AuditSeverity::Warning => tracing::warn!(
                target: "custos::audit",
                kind = %event.kind,
                transaction_id = %transaction,
                actor = %actor,
                details = %event.details,
                "audit"
            ),
            AuditSeverity::Critical => tracing::error!(
                target: "custos::audit",
                kind = %event.kind,
                transaction_id = %transaction,
                actor = %actor,
                details = %event.details,
                "audit"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use custos_core::{AuditEventKind, TransactionId};

    #[tokio::test]
    async fn test_record_never_fails() {
        let log = TracingAuditLog::new();
        log.record(AuditEvent::info(
            AuditEventKind::AuthorizationInitiated,
            TransactionId::new(),
            None,
            "smoke",
        ))
        .await;
    }
}
