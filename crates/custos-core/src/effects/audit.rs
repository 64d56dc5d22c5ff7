//! Audit trail effect interface
//!
//! Every initiate, vote, sign/verify attempt (success and failure), status
//! transition, and execution is recorded. Recording never blocks the
//! authorization path: the trait is infallible from the caller's view and
//! handlers swallow their own failures, reporting them out of band.

use crate::identifiers::{ActorId, TransactionId};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Kind of audited pipeline event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditEventKind {
    /// A new authorization entered the pipeline
    AuthorizationInitiated,
    /// A superseding risk assessment was computed
    RiskReassessed,
    /// A vote was appended to the ledger
    VoteCast,
    /// A vote attempt was refused
    VoteRefused,
    /// A signature record was stored
    SignatureRecorded,
    /// A signature attempt was refused
    SignatureRefused,
    /// A signature record passed verification
    SignatureVerified,
    /// A signature record failed verification
    SignatureVerificationFailed,
    /// The authorization moved to a new status
    StatusChanged,
    /// The authorization was executed
    ExecutionCompleted,
    /// An execute attempt was refused
    ExecutionRefused,
}

impl AuditEventKind {
    /// Stable snake_case name for structured logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AuthorizationInitiated => "authorization_initiated",
            Self::RiskReassessed => "risk_reassessed",
            Self::VoteCast => "vote_cast",
            Self::VoteRefused => "vote_refused",
            Self::SignatureRecorded => "signature_recorded",
            Self::SignatureRefused => "signature_refused",
            Self::SignatureVerified => "signature_verified",
            Self::SignatureVerificationFailed => "signature_verification_failed",
            Self::StatusChanged => "status_changed",
            Self::ExecutionCompleted => "execution_completed",
            Self::ExecutionRefused => "execution_refused",
        }
    }
}

impl fmt::Display for AuditEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Severity attached to an audit event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditSeverity {
    /// Normal pipeline progress
    Info,
    /// A refused or failed attempt worth reviewing
    Warning,
    /// A condition needing immediate attention
    Critical,
}

impl fmt::Display for AuditSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Critical => "critical",
        };
        write!(f, "{name}")
    }
}

/// One entry in the decision trail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEvent {
    /// What happened
    pub kind: AuditEventKind,
    /// How serious it is
    pub severity: AuditSeverity,
    /// The transaction involved, when known
    pub transaction_id: Option<TransactionId>,
    /// The acting principal, when known
    pub actor: Option<ActorId>,
    /// Free-form context: attempted transition, error text, thresholds
    pub details: String,
}

impl AuditEvent {
    /// Info-level event
    pub fn info(
        kind: AuditEventKind,
        transaction_id: TransactionId,
        actor: Option<ActorId>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            severity: AuditSeverity::Info,
            transaction_id: Some(transaction_id),
            actor,
            details: details.into(),
        }
    }

    /// Warning-level event
    pub fn warning(
        kind: AuditEventKind,
        transaction_id: TransactionId,
        actor: Option<ActorId>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            severity: AuditSeverity::Warning,
            transaction_id: Some(transaction_id),
            actor,
            details: details.into(),
        }
    }
}

/// Decision-trail recording
#[async_trait]
pub trait AuditEffects: Send + Sync {
    /// Record one event; failures are the handler's problem, never the
    /// pipeline's
    async fn record(&self, event: AuditEvent);
}

#[async_trait]
impl<T: AuditEffects + ?Sized> AuditEffects for Arc<T> {
    async fn record(&self, event: AuditEvent) {
        (**self).record(event).await;
    }
}
