//! Concurrent-caller behavior against one authorization

mod common;

use common::Harness;
use custos_core::{AuthorizationStatus, CustosError, Role};
use custos_engine::RetryPolicy;
use custos_policy::{PolicyResolver, PolicyRule, PolicyRuleSet};
use custos_testkit::IntentBuilder;
use rust_decimal::Decimal;
use std::collections::BTreeSet;

fn resolver_with_base(base_approvals: u8) -> PolicyResolver {
    let eligible_roles: BTreeSet<Role> = [Role::new("treasury")].into_iter().collect();
    let ruleset = PolicyRuleSet {
        rules: vec![PolicyRule {
            name: format!("base-{base_approvals}"),
            kinds: Vec::new(),
            min_amount: Decimal::ZERO,
            max_amount: None,
            base_approvals,
            required_signatures: None,
            eligible_roles,
            expiry_window_secs: 86_400,
            veto_on_reject: false,
        }],
        ..PolicyRuleSet::builtin()
    };
    PolicyResolver::new(ruleset).unwrap()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn same_approver_double_submit_loses_exactly_once() {
    let harness = Harness::with_resolver(resolver_with_base(2));
    let approver = harness.directory.add_actor("treasury");
    harness.directory.add_actor("treasury");

    let intent = IntentBuilder::new().build().unwrap();
    let id = harness.engine.initiate(intent, approver).await.unwrap();

    let first_engine = harness.engine.clone();
    let second_engine = harness.engine.clone();
    let first = tokio::spawn(async move { first_engine.approve(id, approver, None).await });
    let second = tokio::spawn(async move { second_engine.approve(id, approver, None).await });

    let outcomes = [first.await.unwrap(), second.await.unwrap()];
    let successes = outcomes.iter().filter(|o| o.is_ok()).count();
    assert_eq!(successes, 1, "exactly one submit must win: {outcomes:?}");

    for outcome in &outcomes {
        if let Err(error) = outcome {
            assert!(
                matches!(
                    error,
                    CustosError::DuplicateVote { .. } | CustosError::ConcurrentModification { .. }
                ),
                "unexpected loser error: {error}"
            );
        }
    }

    // One vote row, no double count.
    assert_eq!(harness.engine.tally(id).await.unwrap().approvals, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_distinct_approvers_lose_no_votes() {
    let harness = Harness::with_resolver(resolver_with_base(4));
    let approvers: Vec<_> = (0..4).map(|_| harness.directory.add_actor("treasury")).collect();

    let intent = IntentBuilder::new().build().unwrap();
    let id = harness.engine.initiate(intent, approvers[0]).await.unwrap();

    // Contention is expected here; give the internal retry more room than
    // the default so the test asserts convergence, not luck.
    let engine = harness.engine.clone().with_retry_policy(RetryPolicy {
        max_attempts: 10,
        base_backoff_ms: 2,
    });

    let handles: Vec<_> = approvers
        .iter()
        .map(|approver| {
            let engine = engine.clone();
            let approver = *approver;
            tokio::spawn(async move { engine.approve(id, approver, None).await })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let tally = harness.engine.tally(id).await.unwrap();
    assert_eq!(tally.approvals, 4);
    assert_eq!(
        harness.engine.status(id).await.unwrap().status,
        AuthorizationStatus::Approved
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_execute_runs_once() {
    let harness = Harness::new();
    let (approver, key_ref) = harness.actor_with_key("treasury").await;

    let intent = IntentBuilder::new().build().unwrap();
    let id = harness.engine.initiate(intent, approver).await.unwrap();
    harness.engine.approve(id, approver, None).await.unwrap();
    harness.engine.sign(id, approver, key_ref).await.unwrap();
    harness.engine.verify(id, approver).await.unwrap();

    let engine = harness.engine.clone().with_retry_policy(RetryPolicy {
        max_attempts: 10,
        base_backoff_ms: 2,
    });
    let handles: Vec<_> = (0..3)
        .map(|_| {
            let engine = engine.clone();
            tokio::spawn(async move { engine.execute(id, approver).await })
        })
        .collect();

    let mut results = Vec::new();
    for handle in handles {
        results.push(handle.await.unwrap().unwrap());
    }

    // Every caller sees the same execution; nothing ran twice.
    for result in &results {
        assert_eq!(result, &results[0]);
    }
    assert_eq!(
        harness
            .audit
            .count_of(custos_core::AuditEventKind::ExecutionCompleted),
        1
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_signers_all_recorded() {
    let harness = Harness::with_resolver(resolver_with_base(2));
    let (alice, alice_key) = harness.actor_with_key("treasury").await;
    let (bob, bob_key) = harness.actor_with_key("treasury").await;

    let intent = IntentBuilder::new().build().unwrap();
    let id = harness.engine.initiate(intent, alice).await.unwrap();
    harness.engine.approve(id, alice, None).await.unwrap();
    harness.engine.approve(id, bob, None).await.unwrap();

    let engine = harness.engine.clone().with_retry_policy(RetryPolicy {
        max_attempts: 10,
        base_backoff_ms: 2,
    });
    let signers = [(alice, alice_key), (bob, bob_key)];
    let handles: Vec<_> = signers
        .iter()
        .map(|(signer, key_ref)| {
            let engine = engine.clone();
            let (signer, key_ref) = (*signer, *key_ref);
            tokio::spawn(async move { engine.sign(id, signer, key_ref).await })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let snapshot = harness.engine.status(id).await.unwrap();
    assert_eq!(snapshot.signatures.len(), 2);

    let report = harness.engine.verify(id, alice).await.unwrap();
    assert_eq!(report.newly_verified.len(), 2);
    assert!(report.threshold_met);
    assert_eq!(report.status, AuthorizationStatus::Signed);
}
