//! Partial-failure handling: failed kinds keep their queue and report
//! every affected item, other kinds commit normally.

use pretty_assertions::assert_eq;

use e2e_tests::{Product, TestHarness};
use index_sync_core::{DocumentId, KindOutcome, OperationKind, Severity};

#[test]
fn test_failed_delete_keeps_ids_and_reports_each() {
    let mut harness = TestHarness::new();
    harness.client.fail_on(OperationKind::Delete);

    harness.engine.on_before_remove(&Product::new(42, "Mixing bowl"));
    harness.engine.on_before_remove(&Product::new(43, "Rolling pin"));
    harness.engine.post_commit();

    assert_eq!(
        harness.engine.pending().deletions().to_vec(),
        vec![DocumentId::Int(42), DocumentId::Int(43)]
    );

    let errors = harness.sink.with_severity(Severity::Error);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].message.contains("injected delete_many_by_ids failure"));

    let critical = harness.sink.with_severity(Severity::Critical);
    assert_eq!(critical.len(), 2);
    assert_eq!(
        critical[0].message,
        "index sync delete_many_by_ids failed for product with identifier 42"
    );
    assert_eq!(
        critical[1].message,
        "index sync delete_many_by_ids failed for product with identifier 43"
    );
}

#[test]
fn test_insert_failure_does_not_block_other_kinds() {
    let mut harness = TestHarness::new();
    harness.engine.on_create(Product::new(1, "Saucepan"));
    harness.engine.post_commit();

    harness.client.fail_on(OperationKind::Insert);
    harness.engine.on_create(Product::new(2, "Stockpot"));
    harness.engine.on_update(Product::new(1, "Large saucepan"));
    let report = harness.engine.commit();

    assert!(matches!(
        report.outcome(OperationKind::Insert),
        Some(KindOutcome::Failed { count: 1, .. })
    ));
    assert!(report.outcome(OperationKind::Update).unwrap().is_committed());
    assert_eq!(
        harness.engine.pending().insertions().to_vec(),
        vec![Product::new(2, "Stockpot")]
    );
    assert!(harness.engine.pending().updates().is_empty());
    assert!(!harness.indexed(2));
    assert_eq!(harness.engine.health().insert.consecutive_failures, 1);
}

#[test]
fn test_retry_at_next_trigger_after_outage() {
    let mut harness = TestHarness::new();
    harness.client.fail_on(OperationKind::Insert);
    harness.engine.on_create(Product::new(7, "Spatula"));
    harness.engine.on_create(Product::new(8, "Ladle"));

    harness.engine.post_commit();
    harness.engine.post_commit();
    assert_eq!(harness.engine.pending().insertions().len(), 2);
    assert_eq!(harness.engine.health().insert.consecutive_failures, 2);
    assert_eq!(harness.sink.with_severity(Severity::Critical).len(), 4);

    harness.client.recover();
    harness.engine.post_commit();

    assert!(harness.engine.pending().is_empty());
    assert!(harness.indexed(7));
    assert!(harness.indexed(8));
    assert_eq!(harness.engine.health().insert.consecutive_failures, 0);
    assert_eq!(harness.engine.health().insert.committed_total, 2);

    let attempts = harness.client.calls_of(OperationKind::Insert);
    assert_eq!(attempts.len(), 3);
    assert!(attempts.iter().all(|c| c.ids == vec!["7", "8"]));
}
