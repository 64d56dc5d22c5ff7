//! Custos Core - Authorization Pipeline Foundation
//!
//! This crate provides the foundational domain types and effect interfaces
//! for the Custos transaction authorization pipeline. It contains only pure
//! types and interface definitions with no production handlers or
//! application wiring.
//!
//! # Architecture Layers
//!
//! ## Domain Types
//! - `TransactionIntent`: the proposed money movement, validated at construction
//! - `RiskAssessment`: bounded, explainable risk score with audit factors
//! - `ApprovalPolicy`: resolved approval/signature thresholds
//! - `ApprovalVote` / `SignatureRecord`: per-actor authorization evidence
//! - `TransactionAuthorization`: the aggregate root and its status machine
//!
//! ## Effect Interfaces (Pure Signatures)
//! - `ClockEffects`: wall-clock reads for expiry and timestamps
//! - `KeyVaultEffects`: asymmetric key custody (sign, public key lookup)
//! - `AuditEffects`: decision-trail recording, never blocking the pipeline
//! - `HistoryEffects`: recent-activity snapshots for risk scoring
//! - `DirectoryEffects`: actor roster and role lookups
//! - `AuthorizationStore`: versioned aggregate persistence
//!
//! Handlers for these interfaces live in `custos-effects` (production) and
//! `custos-testkit` (deterministic test doubles).

#![forbid(unsafe_code)]

pub mod authorization;
pub mod crypto;
pub mod effects;
pub mod errors;
pub mod hash;
pub mod identifiers;
pub mod intent;
pub mod policy;
pub mod risk;
pub mod serialization;
pub mod signature;
pub mod votes;

pub use authorization::{AuthorizationStatus, ExecutionResult, TransactionAuthorization};
pub use crypto::{ed25519_verify, PublicKey, Signature, PUBLIC_KEY_LENGTH, SIGNATURE_LENGTH};
pub use effects::{
    AuditEffects, AuditEvent, AuditEventKind, AuditSeverity, AuthorizationStore, ClockEffects,
    DirectoryEffects, HistoryEffects, HistorySnapshot, KeyVaultEffects, Version,
};
pub use errors::{CustosError, CustosResult};
pub use identifiers::{ActorId, KeyRef, Role, TransactionId};
pub use intent::{TransactionIntent, TransactionKind};
pub use policy::ApprovalPolicy;
pub use risk::{RiskAssessment, RiskFactor, RiskFactorKind};
pub use serialization::{from_slice, hash_canonical, to_vec};
pub use signature::{SignatureAlgorithm, SignatureRecord};
pub use votes::{ApprovalVote, VoteDecision};
