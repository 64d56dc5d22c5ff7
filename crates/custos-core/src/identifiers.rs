//! Core identifier types used across the Custos pipeline
//!
//! This module provides the fundamental identifier types that uniquely
//! identify transactions, actors, and key material references.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Transaction identifier
///
/// Uniquely identifies a `TransactionIntent` and the `TransactionAuthorization`
/// aggregate built around it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TransactionId(pub Uuid);

impl TransactionId {
    /// Create a new random transaction ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create from a UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    pub fn uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for TransactionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "txn-{}", self.0)
    }
}

impl From<Uuid> for TransactionId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<TransactionId> for Uuid {
    fn from(id: TransactionId) -> Self {
        id.0
    }
}

/// Actor identifier
///
/// Identifies a human or service principal acting on an authorization.
/// Approvers and signers are both actors; eligibility is a property of the
/// actor's role, not of the identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActorId(pub Uuid);

impl ActorId {
    /// Create a new random actor ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create from a UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    pub fn uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for ActorId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "actor-{}", self.0)
    }
}

impl From<Uuid> for ActorId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<ActorId> for Uuid {
    fn from(id: ActorId) -> Self {
        id.0
    }
}

/// Key material reference
///
/// A weak reference to a signing key owned by the Key Vault. Custos never
/// holds private key material; `SignatureRecord` carries only this handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct KeyRef(pub Uuid);

impl KeyRef {
    /// Create a new random key reference
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create from a UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    pub fn uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for KeyRef {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for KeyRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "key-{}", self.0)
    }
}

impl From<Uuid> for KeyRef {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<KeyRef> for Uuid {
    fn from(key_ref: KeyRef) -> Self {
        key_ref.0
    }
}

/// Role tag carried by an actor
///
/// Approval policies name the set of roles whose holders may vote on a
/// transaction. Roles are opaque tags; the directory decides which actor
/// holds which role.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Role(String);

impl Role {
    /// Create a role from a tag
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    /// Get the role tag
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Role {
    fn from(tag: &str) -> Self {
        Self::new(tag)
    }
}

impl From<String> for Role {
    fn from(tag: String) -> Self {
        Self(tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_display_prefixes() {
        let txn = TransactionId::new();
        let actor = ActorId::new();
        let key = KeyRef::new();

        assert!(txn.to_string().starts_with("txn-"));
        assert!(actor.to_string().starts_with("actor-"));
        assert!(key.to_string().starts_with("key-"));
    }

    #[test]
    fn test_identifier_uuid_roundtrip() {
        let uuid = Uuid::new_v4();
        let id = TransactionId::from_uuid(uuid);
        assert_eq!(id.uuid(), uuid);
        assert_eq!(Uuid::from(id), uuid);
    }

    #[test]
    fn test_role_ordering_is_stable() {
        let mut roles = vec![Role::new("treasury"), Role::new("security")];
        roles.sort();
        assert_eq!(roles[0].as_str(), "security");
        assert_eq!(roles[1].as_str(), "treasury");
    }
}
