// SPDX-FileCopyrightText: 2026 Tagswipe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests for the swipe engine over mock collaborators.

use std::collections::HashSet;

use tagswipe_core::{ItemId, LocalState, TagswipeError, Vote};
use tagswipe_queue::{IngestOutcome, QueueStatus, SharedPhase, SubmitOutcome, SwipeEvent};
use tagswipe_test_utils::{TestHarness, drain_events, movie_page};

fn current_id(engine: &tagswipe_queue::SwipeEngine) -> Option<u64> {
    engine.current().map(|m| m.id.0)
}

#[tokio::test]
async fn shared_item_is_fetched_until_found_and_shown_first() {
    let harness = TestHarness::builder()
        .with_pages(vec![movie_page(&[1, 2, 3], 3), movie_page(&[4, 50, 5], 3)])
        .build()
        .await
        .unwrap();

    let (engine, _events) = harness.open_loaded("heist", Some(50)).await.unwrap();

    assert_eq!(current_id(&engine), Some(50));
    assert_eq!(engine.state().shared().phase(), Some(SharedPhase::Injected));
    assert_eq!(harness.source.requested_pages().await, vec![1, 2]);
    assert_eq!(
        engine.state().backlog().ids(),
        [50, 1, 2, 3, 4, 5].map(ItemId).to_vec()
    );
}

#[tokio::test]
async fn already_voted_shared_item_is_viewable_once() {
    let harness = TestHarness::builder()
        .with_pages(vec![movie_page(&[50, 1, 2], 1)])
        .build()
        .await
        .unwrap();
    harness.memory.seed("voted_movies_heist", "[50]").await;

    let (mut engine, mut events) = harness.open_loaded("heist", Some(50)).await.unwrap();
    assert_eq!(current_id(&engine), Some(50));
    assert!(engine.current_is_view_only());
    assert!(engine.state().shared().was_already_voted());

    let outcome = engine.submit_vote(ItemId(50), Vote::Yes).await.unwrap();
    assert_eq!(outcome, SubmitOutcome::ViewOnly);

    assert!(engine.skip_shared());
    assert_eq!(engine.state().shared().phase(), Some(SharedPhase::Skipped));
    assert_eq!(current_id(&engine), Some(1));
    assert!(engine.has_voted(ItemId(50)));
    assert_eq!(
        drain_events(&mut events),
        vec![SwipeEvent::DeepLinkResolved { item_id: ItemId(50) }]
    );

    engine.settle_writes().await;
    assert_eq!(harness.votes.write_count().await, 0);
}

#[tokio::test]
async fn exhaustion_is_recovered_by_reset() {
    let harness = TestHarness::builder()
        .with_pages(vec![movie_page(&[], 1)])
        .build()
        .await
        .unwrap();

    let (mut engine, mut events) = harness.open_loaded("heist", None).await.unwrap();
    assert_eq!(engine.status(), QueueStatus::Exhausted);
    assert!(drain_events(&mut events).contains(&SwipeEvent::Exhausted {
        tag: engine.tag().clone()
    }));

    // Refill is a no-op while exhausted.
    engine.refill().await.unwrap();
    assert_eq!(harness.source.call_count().await, 1);

    harness.source.set_page(1, movie_page(&[7, 8, 9], 1)).await;
    engine.reset().await.unwrap();
    assert_eq!(engine.status(), QueueStatus::Loading);
    engine.refill().await.unwrap();

    assert_eq!(engine.state().backlog().len(), 3);
    assert_eq!(engine.status(), QueueStatus::Ready);
    let calls = harness.source.calls().await;
    assert_eq!(calls.len(), 2);
    assert_ne!(calls[0].salt, calls[1].salt, "reset bumps the salt");
}

#[tokio::test]
async fn voting_twice_writes_once() {
    let harness = TestHarness::builder()
        .with_pages(vec![movie_page(&[1, 2, 3, 4], 1)])
        .build()
        .await
        .unwrap();
    let (mut engine, _events) = harness.open_loaded("heist", None).await.unwrap();

    let first = engine.submit_vote(ItemId(1), Vote::Yes).await.unwrap();
    assert!(matches!(first, SubmitOutcome::Accepted { .. }));
    let second = engine.submit_vote(ItemId(1), Vote::Yes).await.unwrap();
    assert_eq!(second, SubmitOutcome::Duplicate);

    engine.settle_writes().await;
    assert_eq!(engine.state().ledger().len(), 1);
    let writes = harness.votes.writes().await;
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].item_id, ItemId(1));
    assert_eq!(writes[0].session_id, *engine.session_id());
    assert_eq!(
        harness.memory.get("voted_movies_heist").await.unwrap().as_deref(),
        Some("[1]")
    );
}

#[tokio::test]
async fn votes_and_page_survive_reload() {
    let harness = TestHarness::builder()
        .with_pages(vec![movie_page(&[1, 2, 3], 5), movie_page(&[4, 5, 6], 5)])
        .build()
        .await
        .unwrap();

    {
        let (mut engine, _events) = harness.open_loaded("heist", None).await.unwrap();
        assert_eq!(engine.state().cursor().next_page(), 2);
        engine.submit_vote(ItemId(1), Vote::Yes).await.unwrap();
        engine.submit_vote(ItemId(2), Vote::No).await.unwrap();
        engine.settle_writes().await;
    }

    let (mut reloaded, _events) = harness.open("heist", None).await.unwrap();
    assert!(reloaded.has_voted(ItemId(1)));
    assert!(reloaded.has_voted(ItemId(2)));
    let ticket = reloaded.begin_fetch().expect("fresh session needs items");
    assert_eq!(ticket.page, 2);
}

#[tokio::test]
async fn reload_survival_over_sqlite_state() {
    let harness = TestHarness::builder()
        .with_pages(vec![movie_page(&[1, 2, 3], 5), movie_page(&[4, 5, 6], 5)])
        .with_sqlite_state()
        .build()
        .await
        .unwrap();

    let session_id = {
        let (mut engine, _events) = harness.open_loaded("heist", None).await.unwrap();
        engine.submit_vote(ItemId(3), Vote::Yes).await.unwrap();
        engine.settle_writes().await;
        engine.session_id().clone()
    };

    let (mut reloaded, _events) = harness.open("heist", None).await.unwrap();
    assert_eq!(*reloaded.session_id(), session_id);
    assert!(reloaded.has_voted(ItemId(3)));
    assert_eq!(reloaded.begin_fetch().map(|t| t.page), Some(2));
}

#[tokio::test]
async fn overlapping_pages_never_duplicate() {
    let harness = TestHarness::builder()
        .with_pages(vec![movie_page(&[1, 2, 3], 2), movie_page(&[3, 4, 1, 4], 2)])
        .with_low_water_mark(10)
        .build()
        .await
        .unwrap();
    let (engine, _events) = harness.open_loaded("heist", None).await.unwrap();

    let ids = engine.state().backlog().ids();
    let unique: HashSet<_> = ids.iter().collect();
    assert_eq!(unique.len(), ids.len());
    assert_eq!(ids, [1, 2, 3, 4].map(ItemId).to_vec());
    // Page 2 was refetched, found nothing new, and ended the source.
    assert_eq!(harness.source.requested_pages().await, vec![1, 2, 2]);
    assert_eq!(engine.status(), QueueStatus::Ready);
    assert!(engine.state().is_exhausted());
}

#[tokio::test]
async fn remote_write_failure_is_reported_not_rolled_back() {
    let harness = TestHarness::builder()
        .with_pages(vec![movie_page(&[1, 2, 3], 1)])
        .build()
        .await
        .unwrap();
    harness.votes.set_failing(true);
    let (mut engine, mut events) = harness.open_loaded("heist", None).await.unwrap();

    let outcome = engine.submit_vote(ItemId(1), Vote::No).await.unwrap();
    assert!(matches!(outcome, SubmitOutcome::Accepted { .. }));
    engine.settle_writes().await;

    assert!(engine.has_voted(ItemId(1)));
    assert_eq!(current_id(&engine), Some(2));
    let events = drain_events(&mut events);
    assert!(matches!(
        events.as_slice(),
        [SwipeEvent::WriteFailed { item_id, .. }] if *item_id == ItemId(1)
    ));
}

#[tokio::test]
async fn source_failure_keeps_backlog_and_retries() {
    let harness = TestHarness::builder()
        .with_pages(vec![movie_page(&[1, 2, 3], 1)])
        .build()
        .await
        .unwrap();
    harness.source.push_failure("connection refused").await;

    let (mut engine, mut events) = harness.open_loaded("heist", None).await.unwrap();
    assert_eq!(engine.status(), QueueStatus::Loading);
    assert!(matches!(
        drain_events(&mut events).as_slice(),
        [SwipeEvent::SourceUnavailable { message }] if message.contains("connection refused")
    ));
    assert!(!engine.state().fetch_in_flight());

    engine.refill().await.unwrap();
    assert_eq!(engine.status(), QueueStatus::Ready);
    assert_eq!(harness.source.requested_pages().await, vec![1, 1]);
}

#[tokio::test]
async fn stale_stored_page_restarts_pagination() {
    let harness = TestHarness::builder()
        .with_pages(vec![movie_page(&[1, 2, 3], 2), movie_page(&[4], 2)])
        .build()
        .await
        .unwrap();
    harness.memory.seed("tag_page_heist", "9").await;

    let (engine, mut events) = harness.open_loaded("heist", None).await.unwrap();

    assert_eq!(harness.source.requested_pages().await, vec![9, 1]);
    assert_eq!(current_id(&engine), Some(1));
    assert!(drain_events(&mut events).contains(&SwipeEvent::StaleCursorRecovered {
        tag: engine.tag().clone()
    }));
    assert_eq!(
        harness.memory.get("tag_page_heist").await.unwrap().as_deref(),
        Some("2")
    );
}

#[tokio::test]
async fn local_write_failure_is_an_error() {
    let harness = TestHarness::builder()
        .with_pages(vec![movie_page(&[1, 2, 3], 1)])
        .build()
        .await
        .unwrap();
    let (mut engine, _events) = harness.open_loaded("heist", None).await.unwrap();

    harness.memory.set_fail_writes(true);
    let err = engine.submit_vote(ItemId(1), Vote::Yes).await.unwrap_err();
    assert!(matches!(err, TagswipeError::Storage { .. }));

    // The vote stands and still reaches the vote store.
    assert!(engine.has_voted(ItemId(1)));
    assert_eq!(current_id(&engine), Some(2));
    engine.settle_writes().await;
    assert_eq!(harness.votes.write_count().await, 1);
    assert_eq!(harness.memory.get("voted_movies_heist").await.unwrap(), None);

    // The next successful ledger write catches up.
    harness.memory.set_fail_writes(false);
    engine.submit_vote(ItemId(2), Vote::No).await.unwrap();
    engine.settle_writes().await;
    assert_eq!(harness.votes.write_count().await, 2);
    assert_eq!(
        harness.memory.get("voted_movies_heist").await.unwrap().as_deref(),
        Some("[1,2]")
    );
}

#[tokio::test]
async fn failed_cursor_write_during_stale_recovery_releases_the_fetch() {
    let harness = TestHarness::builder()
        .with_pages(vec![movie_page(&[1, 2, 3], 2), movie_page(&[4], 2)])
        .build()
        .await
        .unwrap();
    harness.memory.seed("tag_page_heist", "9").await;
    let (mut engine, _events) = harness.open("heist", None).await.unwrap();

    harness.memory.set_fail_writes(true);
    let err = engine.refill().await.unwrap_err();
    assert!(matches!(err, TagswipeError::Storage { .. }));
    assert!(!engine.state().fetch_in_flight());
    assert_eq!(engine.status(), QueueStatus::Loading);

    harness.memory.set_fail_writes(false);
    engine.refill().await.unwrap();
    assert_eq!(harness.source.requested_pages().await, vec![9, 1]);
    assert_eq!(current_id(&engine), Some(1));
    assert_eq!(
        harness.memory.get("tag_page_heist").await.unwrap().as_deref(),
        Some("2")
    );
}

#[tokio::test]
async fn refill_stops_at_page_budget_and_resumes() {
    let harness = TestHarness::builder()
        .with_pages(vec![
            movie_page(&[], 5),
            movie_page(&[], 5),
            movie_page(&[], 5),
            movie_page(&[], 5),
            movie_page(&[7, 8, 9], 5),
        ])
        .with_max_pages_per_refill(2)
        .build()
        .await
        .unwrap();
    let (mut engine, _events) = harness.open("heist", None).await.unwrap();

    engine.refill().await.unwrap();
    assert_eq!(harness.source.requested_pages().await, vec![1, 2]);
    assert_eq!(engine.status(), QueueStatus::Loading);
    assert!(!engine.state().fetch_in_flight());
    assert_eq!(engine.state().cursor().next_page(), 3);

    engine.refill().await.unwrap();
    assert_eq!(harness.source.requested_pages().await, vec![1, 2, 3, 4]);

    engine.refill().await.unwrap();
    assert_eq!(harness.source.requested_pages().await, vec![1, 2, 3, 4, 5]);
    assert_eq!(engine.status(), QueueStatus::Ready);
    assert_eq!(current_id(&engine), Some(7));
}

#[tokio::test]
async fn pass_requests_a_supplemental_page_under_new_salt() {
    let harness = TestHarness::builder()
        .with_pages(vec![movie_page(&[1, 2, 3], 5), movie_page(&[4, 5, 6], 5)])
        .with_low_water_mark(2)
        .build()
        .await
        .unwrap();
    let (mut engine, _events) = harness.open_loaded("heist", None).await.unwrap();
    assert_eq!(harness.source.call_count().await, 1);

    let passed = engine.pass();
    assert_eq!(passed.item.map(|m| m.id), Some(ItemId(1)));
    assert!(!engine.has_voted(ItemId(1)));

    engine.refill().await.unwrap();
    let calls = harness.source.calls().await;
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[1].page, 2);
    assert_eq!(calls[1].salt, calls[0].salt + 1);
    assert_eq!(
        engine.state().backlog().ids(),
        [2, 3, 4, 5, 6].map(ItemId).to_vec()
    );
}

#[tokio::test]
async fn missing_shared_item_is_abandoned_at_exhaustion() {
    let harness = TestHarness::builder()
        .with_pages(vec![movie_page(&[1, 2], 1)])
        .build()
        .await
        .unwrap();
    let (engine, mut events) = harness.open_loaded("heist", Some(99)).await.unwrap();

    assert_eq!(engine.state().shared().phase(), Some(SharedPhase::Skipped));
    assert_eq!(
        drain_events(&mut events),
        vec![
            SwipeEvent::DeepLinkResolved { item_id: ItemId(99) },
            SwipeEvent::Exhausted {
                tag: engine.tag().clone()
            },
        ]
    );
    assert_eq!(current_id(&engine), Some(1));
}

#[tokio::test]
async fn late_page_after_reset_is_discarded() {
    let harness = TestHarness::builder()
        .with_pages(vec![movie_page(&[1, 2, 3], 2)])
        .build()
        .await
        .unwrap();
    let (mut engine, _events) = harness.open("heist", None).await.unwrap();

    let ticket = engine.begin_fetch().unwrap();
    assert!(engine.begin_fetch().is_none(), "one fetch at a time");
    engine.reset().await.unwrap();

    let outcome = engine
        .complete_fetch(&ticket, movie_page(&[1, 2, 3], 2))
        .await
        .unwrap();
    assert_eq!(outcome, IngestOutcome::Discarded);
    assert!(engine.state().backlog().is_empty());
    assert!(engine.begin_fetch().is_some());
}

#[tokio::test]
async fn reset_clears_persisted_votes_and_page() {
    let harness = TestHarness::builder()
        .with_pages(vec![movie_page(&[1, 2, 3], 4)])
        .build()
        .await
        .unwrap();
    let (mut engine, _events) = harness.open_loaded("heist", None).await.unwrap();
    engine.submit_vote(ItemId(1), Vote::Yes).await.unwrap();
    engine.settle_writes().await;

    engine.reset().await.unwrap();
    let snapshot = harness.memory.snapshot().await;
    assert!(!snapshot.contains_key("voted_movies_heist"));
    assert!(!snapshot.contains_key("tag_page_heist"));
    assert!(snapshot.contains_key("tag_vote_session_id"));
    assert!(!engine.has_voted(ItemId(1)));
}

#[tokio::test]
async fn stats_come_from_the_vote_store() {
    let harness = TestHarness::builder()
        .with_pages(vec![movie_page(&[1, 2, 3], 1)])
        .build()
        .await
        .unwrap();
    let (mut engine, _events) = harness.open_loaded("heist", None).await.unwrap();
    engine.submit_vote(ItemId(2), Vote::Yes).await.unwrap();
    engine.settle_writes().await;

    let stats = engine.stats(ItemId(2)).await.unwrap();
    assert_eq!((stats.yes, stats.no), (1, 0));
}
