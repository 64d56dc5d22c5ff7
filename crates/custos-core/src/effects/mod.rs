//! Pure effect interfaces (no implementations)
//!
//! Every collaborator the pipeline touches — clock, key vault, audit log,
//! history source, actor directory, persistence gateway — is reached
//! through one of these traits. Production handlers live in
//! `custos-effects`; deterministic doubles live in `custos-testkit`.
//! Services receive handlers by constructor injection; there is no hidden
//! global state.

mod audit;
mod clock;
mod directory;
mod history;
mod store;
mod vault;

pub use audit::{AuditEffects, AuditEvent, AuditEventKind, AuditSeverity};
pub use clock::ClockEffects;
pub use directory::DirectoryEffects;
pub use history::{HistoryEffects, HistorySnapshot};
pub use store::{AuthorizationStore, Version};
pub use vault::KeyVaultEffects;
