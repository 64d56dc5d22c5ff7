//! Persistence gateway interface
//!
//! The store hands out consistent `(aggregate, version)` snapshots and
//! applies optimistic updates keyed by transaction id. A version mismatch
//! means another writer got there first: the update fails with
//! `ConcurrentModification` and the caller re-reads and retries. The core
//! prescribes no storage schema.

use crate::authorization::TransactionAuthorization;
use crate::errors::CustosResult;
use crate::identifiers::TransactionId;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Monotonic per-aggregate version used for optimistic concurrency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Version(pub u64);

impl Version {
    /// Version assigned on insert
    pub fn initial() -> Self {
        Self(0)
    }

    /// The successor version
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// Versioned persistence for authorization aggregates
#[async_trait]
pub trait AuthorizationStore: Send + Sync {
    /// Store a new aggregate at [`Version::initial`]
    ///
    /// Fails with `Storage` if the transaction id already exists.
    async fn insert(&self, authorization: TransactionAuthorization) -> CustosResult<()>;

    /// Load a consistent snapshot and its version
    ///
    /// Fails with `NotFound` for unknown ids.
    async fn load(
        &self,
        id: TransactionId,
    ) -> CustosResult<(TransactionAuthorization, Version)>;

    /// Replace the aggregate if the stored version still matches
    ///
    /// Returns the new version on success; fails with
    /// `ConcurrentModification` when `expected` is stale.
    async fn update(
        &self,
        id: TransactionId,
        expected: Version,
        authorization: TransactionAuthorization,
    ) -> CustosResult<Version>;

    /// Ids of all stored aggregates, for the expiry sweep
    async fn ids(&self) -> Vec<TransactionId>;
}

#[async_trait]
impl<T: AuthorizationStore + ?Sized> AuthorizationStore for Arc<T> {
    async fn insert(&self, authorization: TransactionAuthorization) -> CustosResult<()> {
        (**self).insert(authorization).await
    }

    async fn load(
        &self,
        id: TransactionId,
    ) -> CustosResult<(TransactionAuthorization, Version)> {
        (**self).load(id).await
    }

    async fn update(
        &self,
        id: TransactionId,
        expected: Version,
        authorization: TransactionAuthorization,
    ) -> CustosResult<Version> {
        (**self).update(id, expected, authorization).await
    }

    async fn ids(&self) -> Vec<TransactionId> {
        (**self).ids().await
    }
}
