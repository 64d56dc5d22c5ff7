//! Actor directory interface
//!
//! The directory is the roster of principals and their roles. Eligibility
//! checks and the rejection arithmetic (how many eligible votes remain
//! uncast) both read it.

use crate::identifiers::{ActorId, Role};
use async_trait::async_trait;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Roster and role lookups
#[async_trait]
pub trait DirectoryEffects: Send + Sync {
    /// The role held by an actor, if the actor is known
    async fn role_of(&self, actor: ActorId) -> Option<Role>;

    /// Number of roster members holding any of the given roles
    async fn eligible_count(&self, roles: &BTreeSet<Role>) -> usize;
}

#[async_trait]
impl<T: DirectoryEffects + ?Sized> DirectoryEffects for Arc<T> {
    async fn role_of(&self, actor: ActorId) -> Option<Role> {
        (**self).role_of(actor).await
    }

    async fn eligible_count(&self, roles: &BTreeSet<Role>) -> usize {
        (**self).eligible_count(roles).await
    }
}
