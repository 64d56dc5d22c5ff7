//! Shared harness wiring the engine to deterministic doubles

// Not every test binary touches every helper.
#![allow(dead_code)]

use custos_core::{ActorId, HistorySnapshot, KeyRef, KeyVaultEffects};
use custos_effects::{MemoryAuthorizationStore, SoftwareKeyVault};
use custos_engine::{AuthorizationEngine, EngineServices};
use custos_policy::PolicyResolver;
use custos_risk::RiskScorer;
use custos_testkit::{ManualClock, MemoryAuditLog, ScriptedHistory, StaticDirectory};
use std::sync::Arc;

/// 2024-01-15 12:00:00 UTC — inside business hours
pub const NOON_MS: u64 = 1_705_320_000_000;

/// 2024-01-15 03:00:00 UTC — outside business hours
pub const NIGHT_MS: u64 = 1_705_287_600_000;

pub struct Harness {
    pub engine: AuthorizationEngine,
    pub clock: Arc<ManualClock>,
    pub vault: Arc<SoftwareKeyVault>,
    pub audit: Arc<MemoryAuditLog>,
    pub history: Arc<ScriptedHistory>,
    pub directory: Arc<StaticDirectory>,
    pub store: Arc<MemoryAuthorizationStore>,
}

impl Harness {
    /// Harness over the builtin rule set, frozen at noon, with a quiet
    /// history that already knows the default destination
    pub fn new() -> Self {
        Self::with_resolver(PolicyResolver::builtin())
    }

    pub fn with_resolver(resolver: PolicyResolver) -> Self {
        // RUST_LOG=custos=debug surfaces the pipeline's tracing in test runs.
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let clock = Arc::new(ManualClock::at(NOON_MS));
        let vault = Arc::new(SoftwareKeyVault::from_seed(42));
        let audit = Arc::new(MemoryAuditLog::new());
        let history = Arc::new(ScriptedHistory::with_snapshot(quiet_history()));
        let directory = Arc::new(StaticDirectory::new());
        let store = Arc::new(MemoryAuthorizationStore::new());

        let services = EngineServices {
            clock: clock.clone(),
            vault: vault.clone(),
            audit: audit.clone(),
            history: history.clone(),
            directory: directory.clone(),
            store: store.clone(),
        };
        let engine = AuthorizationEngine::new(RiskScorer::default(), resolver, services);

        Self {
            engine,
            clock,
            vault,
            audit,
            history,
            directory,
            store,
        }
    }

    /// Register an actor with a role and give them a vault key
    pub async fn actor_with_key(&self, role: &str) -> (ActorId, KeyRef) {
        let actor = self.directory.add_actor(role);
        let (key_ref, _) = self.vault.generate_key_pair(actor).await.unwrap();
        (actor, key_ref)
    }
}

/// A snapshot with the default fixture destination already seen and no
/// recent activity
pub fn quiet_history() -> HistorySnapshot {
    HistorySnapshot {
        known_destinations: [String::from("addr:bc1q9yv")].into_iter().collect(),
        recent_transaction_times: Vec::new(),
    }
}

/// A snapshot that makes everything suspicious: unseen destination and a
/// burst of recent transactions ending at `now_ms`
pub fn hot_history(now_ms: u64) -> HistorySnapshot {
    HistorySnapshot {
        known_destinations: std::collections::BTreeSet::new(),
        recent_transaction_times: vec![
            now_ms - 1_000,
            now_ms - 2_000,
            now_ms - 3_000,
            now_ms - 4_000,
        ],
    }
}
