//! Integration tests for a full review session.
//!
//! Drives the controller through load, select, approve, reject and skip
//! against a scripted API and checks the queue, selection and count.

mod common;

use crate::common::{key, pair, queue_keys, ReviewHarness};
use review_api_client::{Decision, SharedCoauthor};
use review_core::testing::detail_for;
use review_core::{
    DetailState, InputAction, Key, KeyMap, MatchView, ReviewError, SessionCommand, SessionEvent,
    SortKey,
};
use test_context::test_context;

// =============================================================================
// Decisions
// =============================================================================

#[test_context(ReviewHarness)]
#[tokio::test]
async fn approve_removes_pair_and_advances_to_head(ctx: &ReviewHarness) {
    ctx.load(vec![pair(1, 90.0), pair(2, 70.0)]).await;
    ctx.session.select(1, 101).await.unwrap();

    let ack = ctx
        .session
        .decide(Decision::Approve, None)
        .await
        .unwrap()
        .expect("decision should be submitted");

    assert!(ack.success);
    assert_eq!(ack.status.as_deref(), Some("approved"));

    let snap = ctx.snapshot().await;
    assert_eq!(queue_keys(&snap), vec![key(2)]);
    assert_eq!(snap.reviewed_count, 1);
    assert_eq!(snap.selection, Some(key(2)));

    let calls = ctx.api.decision_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, key(1));
    assert_eq!(calls[0].1.custom_name.as_deref(), Some("A1"));
}

#[test_context(ReviewHarness)]
#[tokio::test]
async fn approve_defaults_to_loaded_detail_name_and_trims_edits(ctx: &ReviewHarness) {
    let mut entry = pair(1, 90.0);
    entry.name_a = "J. Smith".into();
    let mut detail = detail_for(&entry);
    detail.author_a.name = "Jane Smith".into();
    ctx.api.set_detail(detail);
    ctx.load(vec![entry, pair(2, 70.0)]).await;

    ctx.session.refresh_detail().await.unwrap();
    ctx.session
        .decide(Decision::Approve, Some("   ".into()))
        .await
        .unwrap();
    ctx.session
        .decide(Decision::Approve, Some("  Jane Q. Smith  ".into()))
        .await
        .unwrap();

    let calls = ctx.api.decision_calls();
    assert_eq!(calls[0].1.custom_name.as_deref(), Some("Jane Smith"));
    assert_eq!(calls[1].0, key(2));
    assert_eq!(calls[1].1.custom_name.as_deref(), Some("Jane Q. Smith"));
}

#[test_context(ReviewHarness)]
#[tokio::test]
async fn reject_never_sends_a_name(ctx: &ReviewHarness) {
    ctx.load(vec![pair(1, 90.0), pair(2, 70.0)]).await;

    ctx.session
        .dispatch(SessionCommand::Reject)
        .await
        .unwrap();

    let calls = ctx.api.decision_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].1.decision, Decision::Reject);
    assert_eq!(calls[0].1.custom_name, None);
    assert_eq!(ctx.snapshot().await.reviewed_count, 1);
}

#[test_context(ReviewHarness)]
#[tokio::test]
async fn server_rejection_surfaces_message_and_keeps_queue(ctx: &ReviewHarness) {
    ctx.load(vec![pair(1, 90.0), pair(2, 70.0)]).await;
    let mut events = ctx.session.subscribe();
    ctx.api.fail_next_decision(ReviewError::Server {
        code: 500,
        message: "database is locked".into(),
    });

    let err = ctx.session.decide(Decision::Approve, None).await.unwrap_err();

    assert!(err.is_retryable());
    assert_eq!(err.to_string(), "Server error (500): database is locked");
    let snap = ctx.snapshot().await;
    assert_eq!(queue_keys(&snap), vec![key(1), key(2)]);
    assert_eq!(snap.selection, Some(key(1)));
    assert_eq!(snap.reviewed_count, 0);
    assert_eq!(snap.last_error, Some(err.clone()));

    let mut failed = false;
    while let Ok(event) = events.try_recv() {
        if event == (SessionEvent::Failed { error: err.clone() }) {
            failed = true;
        }
    }
    assert!(failed);
}

#[test_context(ReviewHarness)]
#[tokio::test]
async fn reviewing_whole_queue_leaves_no_selection(ctx: &ReviewHarness) {
    ctx.load(vec![pair(1, 90.0), pair(2, 70.0), pair(3, 50.0)]).await;

    for _ in 0..3 {
        ctx.session.decide(Decision::Reject, None).await.unwrap();
    }

    let snap = ctx.snapshot().await;
    assert!(snap.queue.is_empty());
    assert_eq!(snap.selection, None);
    assert_eq!(snap.reviewed_count, 3);

    // Nothing left to decide on
    assert!(ctx.session.decide(Decision::Reject, None).await.unwrap().is_none());
    assert_eq!(ctx.api.decision_calls().len(), 3);
}

// =============================================================================
// Skip
// =============================================================================

#[test_context(ReviewHarness)]
#[tokio::test]
async fn skip_rotates_selected_pair_to_tail(ctx: &ReviewHarness) {
    ctx.load(vec![pair(1, 90.0), pair(2, 70.0), pair(3, 50.0)]).await;
    ctx.session.select(1, 101).await.unwrap();
    let calls_before = ctx.api.total_calls();

    assert!(ctx.session.skip().await);

    let snap = ctx.snapshot().await;
    assert_eq!(queue_keys(&snap), vec![key(2), key(3), key(1)]);
    assert_eq!(snap.selection, Some(key(2)));
    assert_eq!(snap.reviewed_count, 0);
    assert_eq!(snap.detail, DetailState::Idle);
    assert_eq!(ctx.api.total_calls(), calls_before);
}

#[test_context(ReviewHarness)]
#[tokio::test]
async fn skip_of_non_head_selection_selects_head(ctx: &ReviewHarness) {
    ctx.load(vec![pair(1, 90.0), pair(2, 70.0), pair(3, 50.0)]).await;
    ctx.session.select(2, 102).await.unwrap();

    ctx.session.skip().await;

    let snap = ctx.snapshot().await;
    assert_eq!(queue_keys(&snap), vec![key(1), key(3), key(2)]);
    assert_eq!(snap.selection, Some(key(1)));
}

#[test_context(ReviewHarness)]
#[tokio::test]
async fn skip_on_empty_queue_is_noop(ctx: &ReviewHarness) {
    ctx.load(Vec::new()).await;

    assert!(!ctx.session.skip().await);
    assert_eq!(ctx.snapshot().await.selection, None);
}

// =============================================================================
// Reload and view
// =============================================================================

#[test_context(ReviewHarness)]
#[tokio::test]
async fn reload_keeps_surviving_selection(ctx: &ReviewHarness) {
    ctx.load(vec![pair(1, 90.0), pair(2, 70.0)]).await;
    ctx.session.select(2, 102).await.unwrap();

    ctx.load(vec![pair(3, 95.0), pair(2, 70.0)]).await;
    assert_eq!(ctx.snapshot().await.selection, Some(key(2)));

    ctx.load(vec![pair(3, 95.0)]).await;
    assert_eq!(ctx.snapshot().await.selection, Some(key(3)));
}

#[test_context(ReviewHarness)]
#[tokio::test]
async fn displayed_projection_leaves_canonical_queue_alone(ctx: &ReviewHarness) {
    let mut connected = pair(2, 40.0);
    connected.has_path = true;
    connected.shared_coauthor_count = Some(4);
    ctx.load(vec![pair(1, 90.0), connected, pair(3, 60.0)]).await;

    ctx.session.set_sort(SortKey::ScoreAsc).await;
    let displayed: Vec<_> = ctx.session.displayed().await.iter().map(|m| m.key()).collect();
    assert_eq!(displayed, vec![key(2), key(3), key(1)]);

    ctx.session.set_connected_only(true).await;
    let displayed: Vec<_> = ctx.session.displayed().await.iter().map(|m| m.key()).collect();
    assert_eq!(displayed, vec![key(2)]);

    ctx.session.set_connected_only(false).await;
    ctx.session.set_search("a3").await;
    let snap = ctx.snapshot().await;
    assert_eq!(snap.displayed.len(), 1);
    assert_eq!(snap.displayed[0].key(), key(3));
    assert_eq!(queue_keys(&snap), vec![key(1), key(2), key(3)]);
}

// =============================================================================
// Detail and key map
// =============================================================================

#[test_context(ReviewHarness)]
#[tokio::test]
async fn selected_detail_builds_match_view(ctx: &ReviewHarness) {
    let entry = pair(1, 92.0);
    let mut detail = detail_for(&entry);
    detail.evidence = vec![
        SharedCoauthor {
            name: "R. Jones".into(),
            total_overlap: Some(5),
            count_a: 3,
            count_b: 2,
        },
        SharedCoauthor {
            name: "K. Lee".into(),
            total_overlap: None,
            count_a: 1,
            count_b: 1,
        },
    ];
    ctx.load(vec![entry]).await;
    ctx.session.select(1, 101).await.unwrap();

    let snap = ctx.snapshot().await;
    let loaded = snap.detail.detail().expect("detail should be loaded");
    let view = MatchView::build(loaded);
    assert_eq!(view.id_a, 1);
    assert!(view.attributes[0].has_disagreement);
    assert_eq!(view.graph.nodes.len(), 2);

    let view = MatchView::build(&detail);
    assert_eq!(view.graph.nodes.len(), 4);
    assert_eq!(view.graph.links.len(), 5);
}

#[test_context(ReviewHarness)]
#[tokio::test]
async fn key_presses_drive_the_session(ctx: &ReviewHarness) {
    ctx.load(vec![pair(1, 90.0), pair(2, 70.0), pair(3, 50.0)]).await;
    let keys = KeyMap::default();

    for pressed in [Key::Char('s'), Key::Down, Key::Char('r')] {
        match keys.resolve(pressed) {
            Some(InputAction::Session(command)) => {
                ctx.session.dispatch(command.clone()).await.unwrap()
            }
            other => panic!("unexpected binding for {:?}: {:?}", pressed, other),
        }
    }

    // skip -> [2,3,1] sel 2; down in score order (1,2,3) -> 3; reject 3
    let snap = ctx.snapshot().await;
    assert_eq!(ctx.api.decision_calls()[0].0, key(3));
    assert_eq!(queue_keys(&snap), vec![key(2), key(1)]);
    assert_eq!(snap.selection, Some(key(2)));
    assert_eq!(snap.reviewed_count, 1);
}
