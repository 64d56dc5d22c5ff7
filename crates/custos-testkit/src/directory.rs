//! Fixed actor roster

use async_trait::async_trait;
use custos_core::{ActorId, DirectoryEffects, Role};
use parking_lot::RwLock;
use std::collections::{BTreeSet, HashMap};

/// Directory over a fixed roster built up by the test
#[derive(Debug, Default)]
pub struct StaticDirectory {
    roles: RwLock<HashMap<ActorId, Role>>,
}

impl StaticDirectory {
    /// Create an empty roster
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an actor with a role, replacing any prior registration
    pub fn register(&self, actor: ActorId, role: Role) {
        self.roles.write().insert(actor, role);
    }

    /// Register a fresh actor with the given role and return its id
    pub fn add_actor(&self, role: impl Into<String>) -> ActorId {
        let actor = ActorId::new();
        self.register(actor, Role::new(role));
        actor
    }

    /// Remove an actor from the roster
    pub fn remove(&self, actor: ActorId) {
        self.roles.write().remove(&actor);
    }
}

#[async_trait]
impl DirectoryEffects for StaticDirectory {
    async fn role_of(&self, actor: ActorId) -> Option<Role> {
        self.roles.read().get(&actor).cloned()
    }

    async fn eligible_count(&self, roles: &BTreeSet<Role>) -> usize {
        self.roles
            .read()
            .values()
            .filter(|role| roles.contains(role))
            .count()
    }
}
