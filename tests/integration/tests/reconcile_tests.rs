//! Reconciler scenario tests
//!
//! Drive `StarboardService::reconcile` against the in-memory collaborators.
//!
//! Run with: cargo test -p integration-tests --test reconcile_tests

use integration_tests::{fixtures, SinkCall, TestHarness};
use starboard_core::{DomainError, StarboardSettings};
use starboard_service::{ReconcileOutcome, ServiceError, StarboardService};

// ============================================================================
// Threshold
// ============================================================================

#[tokio::test]
async fn test_below_threshold_is_a_noop() {
    let h = TestHarness::new(3);
    let message = h.post_message("almost famous");
    h.set_stars(&message, 2);

    let outcome = h.reconcile(&message).await.unwrap();

    assert_eq!(outcome, ReconcileOutcome::Unchanged);
    assert!(h.sink.calls().is_empty());
    assert!(h.store.is_empty());
}

#[tokio::test]
async fn test_threshold_boundary() {
    let h = TestHarness::new(3);
    let message = h.post_message("look at this");

    h.set_stars(&message, 2);
    assert_eq!(h.reconcile(&message).await.unwrap(), ReconcileOutcome::Unchanged);

    h.set_stars(&message, 3);
    let outcome = h.reconcile(&message).await.unwrap();

    let ReconcileOutcome::Created { mirrored_id } = outcome else {
        panic!("expected a new post, got {outcome:?}");
    };
    let row = h.store.row(message.id).unwrap();
    assert_eq!(row.mirrored_message_id, mirrored_id);
    assert_eq!(row.star_count, 3);
    h.assert_consistent();
}

#[tokio::test]
async fn test_rendered_post() {
    let h = TestHarness::new(3);
    let message = h.post_message("a very good post");
    h.set_stars(&message, 3);

    h.reconcile(&message).await.unwrap();

    let post = h.mirrored_post(&message).unwrap();
    assert_eq!(post.content, "⭐ 3");
    assert_eq!(post.embed.description.as_deref(), Some("a very good post"));
    assert_eq!(post.embed.field("Stars"), Some("3"));
    assert_eq!(post.embed.field("Author"), Some("<@42>"));
    assert_eq!(post.embed.field("Channel"), Some("<#300>"));
    assert_eq!(
        post.embed.footer,
        Some(format!("Message ID: {}", message.id))
    );
    assert_eq!(
        h.sink.calls(),
        vec![SinkCall::Send {
            destination: fixtures::STARBOARD_ID
        }]
    );
}

#[tokio::test]
async fn test_settings_are_taken_per_call() {
    let h = TestHarness::new(3);
    let message = h.post_message("depends who you ask");
    h.set_stars(&message, 4);

    let strict = fixtures::settings(5);
    let outcome = StarboardService::new(&h.ctx)
        .reconcile(&message, &strict)
        .await
        .unwrap();
    assert_eq!(outcome, ReconcileOutcome::Unchanged);

    let lenient = fixtures::settings(4);
    let outcome = StarboardService::new(&h.ctx)
        .reconcile(&message, &lenient)
        .await
        .unwrap();
    assert!(matches!(outcome, ReconcileOutcome::Created { .. }));
}

// ============================================================================
// Idempotence and convergence
// ============================================================================

#[tokio::test]
async fn test_reconcile_is_idempotent() {
    let h = TestHarness::new(3);
    let message = h.post_message("same again");
    h.set_stars(&message, 4);

    let first = h.reconcile(&message).await.unwrap();
    let row_before = h.store.row(message.id).unwrap();
    let post_before = h.mirrored_post(&message).unwrap();

    let second = h.reconcile(&message).await.unwrap();
    let row_after = h.store.row(message.id).unwrap();
    let post_after = h.mirrored_post(&message).unwrap();

    let mirrored_id = first.mirrored_id().unwrap();
    assert_eq!(second, ReconcileOutcome::Updated { mirrored_id });
    assert_eq!(row_after.mirrored_message_id, row_before.mirrored_message_id);
    assert_eq!(row_after.star_count, row_before.star_count);
    assert_eq!(post_after, post_before);

    // One create, then a no-op edit of the same post
    assert_eq!(
        h.sink.calls(),
        vec![
            SinkCall::Send {
                destination: fixtures::STARBOARD_ID
            },
            SinkCall::Edit {
                destination: fixtures::STARBOARD_ID,
                mirrored_id
            },
        ]
    );
}

#[tokio::test]
async fn test_count_change_edits_in_place() {
    let h = TestHarness::new(3);
    let message = h.post_message("climbing");
    h.set_stars(&message, 3);
    let created = h.reconcile(&message).await.unwrap();

    h.set_stars(&message, 7);
    let updated = h.reconcile(&message).await.unwrap();

    assert_eq!(updated.mirrored_id(), created.mirrored_id());
    assert_eq!(h.mirrored_post(&message).unwrap().content, "⭐ 7");
    assert_eq!(h.store.row(message.id).unwrap().star_count, 7);
    assert_eq!(h.sink.send_count(), 1);
}

#[tokio::test]
async fn test_convergence_over_a_count_sequence() {
    let h = TestHarness::new(3);
    let message = h.post_message("up and down");

    for count in [1, 3, 5, 2, 0, 4, 4, 1, 3, 6] {
        h.set_stars(&message, count);
        h.reconcile(&message).await.unwrap();

        h.assert_consistent();
        match h.store.row(message.id) {
            Some(row) => {
                assert!(count >= 3, "row kept at count {count}");
                assert_eq!(row.star_count, count);
                let post = h.sink.post(row.mirrored_message_id).unwrap();
                assert_eq!(post.content, format!("⭐ {count}"));
            }
            None => assert!(count < 3, "no row at count {count}"),
        }
    }
    assert_eq!(h.store.len(), 1);
}

#[tokio::test]
async fn test_count_is_read_fresh_every_time() {
    let h = TestHarness::new(3);
    let message = h.post_message("fresh");
    h.set_stars(&message, 3);

    h.reconcile(&message).await.unwrap();
    h.reconcile(&message).await.unwrap();

    assert_eq!(h.source.count_reads(), 2);
}

// ============================================================================
// Deletion on drop
// ============================================================================

#[tokio::test]
async fn test_drop_below_threshold_deletes_post_and_row() {
    let h = TestHarness::new(3);
    let message = h.post_message("fading");
    h.set_stars(&message, 5);
    let mirrored_id = h.reconcile(&message).await.unwrap().mirrored_id().unwrap();

    h.set_stars(&message, 2);
    let outcome = h.reconcile(&message).await.unwrap();

    assert_eq!(outcome, ReconcileOutcome::Removed { mirrored_id });
    assert!(h.sink.post(mirrored_id).is_none());
    assert!(h.store.row(message.id).is_none());
    h.assert_consistent();

    // Nothing left to do
    let calls = h.sink.calls().len();
    assert_eq!(h.reconcile(&message).await.unwrap(), ReconcileOutcome::Unchanged);
    assert_eq!(h.sink.calls().len(), calls);
}

#[tokio::test]
async fn test_all_stars_removed() {
    let h = TestHarness::new(1);
    let message = h.post_message("one fan");
    h.set_stars(&message, 1);
    h.reconcile(&message).await.unwrap();

    h.set_stars(&message, 0);
    let outcome = h.reconcile(&message).await.unwrap();

    assert!(matches!(outcome, ReconcileOutcome::Removed { .. }));
    assert!(h.store.is_empty());
    assert_eq!(h.sink.live_posts(), 0);
}

#[tokio::test]
async fn test_drop_when_post_already_gone() {
    let h = TestHarness::new(3);
    let message = h.post_message("deleted by a mod");
    h.set_stars(&message, 3);
    let mirrored_id = h.reconcile(&message).await.unwrap().mirrored_id().unwrap();
    h.sink.vanish(mirrored_id);

    h.set_stars(&message, 1);
    let outcome = h.reconcile(&message).await.unwrap();

    assert_eq!(outcome, ReconcileOutcome::Removed { mirrored_id });
    assert!(h.store.is_empty());
}

#[tokio::test]
async fn test_drop_without_delete_permission_still_removes_row() {
    let h = TestHarness::new(3);
    let message = h.post_message("stuck");
    h.set_stars(&message, 3);
    let mirrored_id = h.reconcile(&message).await.unwrap().mirrored_id().unwrap();
    h.sink.forbid_deletes(true);

    h.set_stars(&message, 2);
    let outcome = h.reconcile(&message).await.unwrap();

    assert_eq!(outcome, ReconcileOutcome::Removed { mirrored_id });
    assert!(h.store.is_empty());
    // The post stays behind, orphaned
    assert!(h.sink.post(mirrored_id).is_some());
}

// ============================================================================
// Healing
// ============================================================================

#[tokio::test]
async fn test_missing_post_is_recreated() {
    let h = TestHarness::new(3);
    let message = h.post_message("phoenix");
    h.set_stars(&message, 3);
    let stale_id = h.reconcile(&message).await.unwrap().mirrored_id().unwrap();
    h.sink.vanish(stale_id);

    h.set_stars(&message, 4);
    let outcome = h.reconcile(&message).await.unwrap();

    let ReconcileOutcome::Healed {
        stale_id: reported_stale,
        mirrored_id,
    } = outcome
    else {
        panic!("expected a replacement post, got {outcome:?}");
    };
    assert_eq!(reported_stale, stale_id);
    assert_ne!(mirrored_id, stale_id);

    let row = h.store.row(message.id).unwrap();
    assert_eq!(row.mirrored_message_id, mirrored_id);
    assert_eq!(row.star_count, 4);
    assert_eq!(h.sink.post(mirrored_id).unwrap().content, "⭐ 4");
    assert_eq!(h.sink.live_posts(), 1);
    h.assert_consistent();
}

#[tokio::test]
async fn test_heal_refused_drops_stale_row() {
    let h = TestHarness::new(3);
    let message = h.post_message("nowhere to go");
    h.set_stars(&message, 3);
    let stale_id = h.reconcile(&message).await.unwrap().mirrored_id().unwrap();
    h.sink.vanish(stale_id);
    h.sink.forbid_sends(true);

    let outcome = h.reconcile(&message).await.unwrap();

    assert_eq!(outcome, ReconcileOutcome::Refused);
    assert!(h.store.is_empty());
    h.assert_consistent();
}

// ============================================================================
// Refused destination
// ============================================================================

#[tokio::test]
async fn test_send_refused_writes_no_row() {
    let h = TestHarness::new(3);
    let message = h.post_message("no entry");
    h.set_stars(&message, 3);
    h.sink.forbid_sends(true);

    assert_eq!(h.reconcile(&message).await.unwrap(), ReconcileOutcome::Refused);
    assert!(h.store.is_empty());

    // Permission fixed: the next reconciliation creates the post
    h.sink.forbid_sends(false);
    let outcome = h.reconcile(&message).await.unwrap();
    assert!(matches!(outcome, ReconcileOutcome::Created { .. }));
    h.assert_consistent();
}

#[tokio::test]
async fn test_edit_forbidden_keeps_mapping() {
    let h = TestHarness::new(3);
    let message = h.post_message("frozen");
    h.set_stars(&message, 3);
    let mirrored_id = h.reconcile(&message).await.unwrap().mirrored_id().unwrap();
    h.sink.forbid_edits(true);

    h.set_stars(&message, 5);
    let outcome = h.reconcile(&message).await.unwrap();

    assert_eq!(outcome, ReconcileOutcome::Retained { mirrored_id });
    let row = h.store.row(message.id).unwrap();
    assert_eq!(row.mirrored_message_id, mirrored_id);
    assert_eq!(row.star_count, 5);
    // The post itself could not be touched
    assert_eq!(h.sink.post(mirrored_id).unwrap().content, "⭐ 3");
    assert_eq!(h.sink.send_count(), 1);
}

#[tokio::test]
async fn test_unconfigured_destination_skips() {
    let settings = StarboardSettings {
        starboard_channel_id: None,
        ..fixtures::settings(3)
    };
    let h = TestHarness::with_settings(settings, true);
    let message = h.post_message("into the void");
    h.set_stars(&message, 10);

    let outcome = h.reconcile(&message).await.unwrap();

    assert_eq!(outcome, ReconcileOutcome::NotConfigured);
    assert_eq!(h.source.count_reads(), 0);
    assert!(h.sink.calls().is_empty());
    assert!(h.store.is_empty());
    assert_eq!(h.monitor.stats().starboard_updates, 0);
}

// ============================================================================
// Fatal errors
// ============================================================================

#[tokio::test]
async fn test_deleted_message_is_abandoned() {
    let h = TestHarness::new(3);
    let message = h.post_message("deleted by its author");
    h.set_stars(&message, 3);
    let mirrored_id = h.reconcile(&message).await.unwrap().mirrored_id().unwrap();
    h.source.delete_message(message.id);

    let outcome = h.reconcile(&message).await.unwrap();

    assert_eq!(outcome, ReconcileOutcome::Abandoned);
    assert_eq!(h.store.row(message.id).unwrap().mirrored_message_id, mirrored_id);
    assert_eq!(h.sink.calls().len(), 1);
    assert_eq!(h.monitor.stats().starboard_updates, 1);
}

#[tokio::test]
async fn test_store_read_error_propagates() {
    let h = TestHarness::new(3);
    let message = h.post_message("db down");
    h.set_stars(&message, 3);
    h.store.set_failing(true);

    let err = h.reconcile(&message).await.unwrap_err();

    assert!(matches!(
        err,
        ServiceError::Domain(DomainError::DatabaseError(_))
    ));
    assert!(err.is_retryable());
    assert!(h.sink.calls().is_empty());
}

#[tokio::test]
async fn test_store_write_error_propagates() {
    let h = TestHarness::new(3);
    let message = h.post_message("half done");
    h.set_stars(&message, 3);
    h.store.set_failing_writes(true);

    let err = h.reconcile(&message).await.unwrap_err();

    assert!(err.is_retryable());
    assert!(h.store.is_empty());
    assert_eq!(h.sink.send_count(), 1);
}

#[tokio::test]
async fn test_sink_transport_error_propagates() {
    let h = TestHarness::new(3);
    let message = h.post_message("network down");
    h.set_stars(&message, 3);
    h.sink.set_failing(true);

    let err = h.reconcile(&message).await.unwrap_err();

    assert!(matches!(err, ServiceError::Domain(DomainError::RemoteError(_))));
    assert!(h.store.is_empty());
}

// ============================================================================
// Metrics
// ============================================================================

#[tokio::test]
async fn test_every_reconciliation_is_recorded() {
    let h = TestHarness::new(3);
    let message = h.post_message("counted");

    for count in [1, 3, 2] {
        h.set_stars(&message, count);
        h.reconcile(&message).await.unwrap();
    }

    let stats = h.monitor.stats();
    assert_eq!(stats.starboard_updates, 3);
    assert!(stats.max_update_time >= stats.avg_update_time);
    assert_eq!(h.monitor.history().len(), 3);
}

// ============================================================================
// End-to-end scenario
// ============================================================================

#[tokio::test]
async fn test_star_drop_and_restar_scenario() {
    let h = TestHarness::new(3);
    let m1 = h.post_message("M1");

    // Reaches 3: S1 created
    h.set_stars(&m1, 3);
    let s1 = h.reconcile(&m1).await.unwrap().mirrored_id().unwrap();
    assert_eq!(h.sink.post(s1).unwrap().content, "⭐ 3");
    assert_eq!(h.store.row(m1.id).unwrap().mirrored_message_id, s1);

    // Down to 2: S1 deleted, mapping removed
    h.set_stars(&m1, 2);
    assert_eq!(
        h.reconcile(&m1).await.unwrap(),
        ReconcileOutcome::Removed { mirrored_id: s1 }
    );
    assert!(h.sink.post(s1).is_none());
    assert!(h.store.row(m1.id).is_none());

    // Back up to 4: S2 created
    h.set_stars(&m1, 4);
    let s2 = h.reconcile(&m1).await.unwrap().mirrored_id().unwrap();
    assert_ne!(s1, s2);

    let row = h.store.row(m1.id).unwrap();
    assert_eq!(row.mirrored_message_id, s2);
    assert_eq!(row.star_count, 4);
    assert_eq!(h.sink.post(s2).unwrap().content, "⭐ 4");
    h.assert_consistent();
}
