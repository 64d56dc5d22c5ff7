//! In-memory versioned aggregate store
//!
//! The whole map sits behind one mutex, so loads are consistent snapshots
//! and updates are atomic compare-and-swap on the record version. A real
//! deployment implements `AuthorizationStore` against a database with the
//! same uniqueness and versioning semantics.

use async_trait::async_trait;
use custos_core::{
    AuthorizationStore, CustosError, CustosResult, TransactionAuthorization, TransactionId,
    Version,
};
use parking_lot::Mutex;
use std::collections::HashMap;

/// In-memory `AuthorizationStore` with optimistic versioning
#[derive(Default)]
pub struct MemoryAuthorizationStore {
    records: Mutex<HashMap<TransactionId, (TransactionAuthorization, Version)>>,
}

impl MemoryAuthorizationStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored aggregates
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}

#[async_trait]
impl AuthorizationStore for MemoryAuthorizationStore {
    async fn insert(&self, authorization: TransactionAuthorization) -> CustosResult<()> {
        let id = authorization.id();
        let mut records = self.records.lock();
        if records.contains_key(&id) {
            return Err(CustosError::storage(format!("{id} already exists")));
        }
        records.insert(id, (authorization, Version::initial()));
        Ok(())
    }

    async fn load(
        &self,
        id: TransactionId,
    ) -> CustosResult<(TransactionAuthorization, Version)> {
        self.records
            .lock()
            .get(&id)
            .cloned()
            .ok_or_else(|| CustosError::not_found(format!("{id} is not stored")))
    }

    async fn update(
        &self,
        id: TransactionId,
        expected: Version,
        authorization: TransactionAuthorization,
    ) -> CustosResult<Version> {
        let mut records = self.records.lock();
        let slot = records
            .get_mut(&id)
            .ok_or_else(|| CustosError::not_found(format!("{id} is not stored")))?;
        if slot.1 != expected {
            return Err(CustosError::concurrent_modification(format!(
                "{id} is at {} but the writer read {expected}",
                slot.1
            )));
        }
        let next = expected.next();
        *slot = (authorization, next);
        Ok(next)
    }

    async fn ids(&self) -> Vec<TransactionId> {
        self.records.lock().keys().copied().collect()
    }
}
