//! Listing controller behaviour against a scripted page source and an
//! in-memory record store.

use std::sync::Arc;

use jobdeck_db::MemoryRecordStore;
use jobdeck_engine::{
    DropReason, ErrorKind, ExperienceLevel, FilterChoice, FilterSet, ListingConfig,
    ListingController, LoadOutcome, Record, RecordId, RefreshPolicy,
};
use jobdeck_source::{MockPage, MockPageSource};

fn controller_with(source: &MockPageSource, store: &MemoryRecordStore) -> ListingController {
    ListingController::new(Arc::new(source.clone()), Arc::new(store.clone()))
}

fn controller_with_config(
    source: &MockPageSource,
    store: &MemoryRecordStore,
    config: ListingConfig,
) -> ListingController {
    ListingController::with_config(Arc::new(source.clone()), Arc::new(store.clone()), config)
}

fn ids(ids: &[&str]) -> Vec<Record> {
    ids.iter().map(|id| Record::new(*id)).collect()
}

// ---------------------------------------------------------------------------
// Paging
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_twenty_then_empty_exhausts() {
    let source = MockPageSource::new()
        .with_numbered_page(1, 20)
        .with_page(2, vec![]);
    let controller = controller_with(&source, &MemoryRecordStore::new());

    assert!(controller.load_next().await.is_loaded());
    let second = controller.load_next().await;
    assert!(matches!(
        second,
        LoadOutcome::Loaded {
            added: 0,
            exhausted: true,
            ..
        }
    ));

    let snap = controller.snapshot().await;
    assert_eq!(snap.total_loaded, 20);
    assert_eq!(snap.result_count, 20);
    assert!(!snap.has_more);

    let third = controller.load_next().await;
    assert_eq!(third, LoadOutcome::Dropped(DropReason::Exhausted));
    assert_eq!(source.calls(), vec![1, 2]);
}

#[tokio::test]
async fn test_failed_load_leaves_collection_and_cursor() {
    let source = MockPageSource::new()
        .with_numbered_page(1, 3)
        .with_failure(2, "connection reset");
    let controller = controller_with(&source, &MemoryRecordStore::new());

    controller.load_next().await;
    let outcome = controller.load_next().await;
    let LoadOutcome::Failed(error) = outcome else {
        panic!("expected failure, got {outcome:?}");
    };
    assert_eq!(error.kind, ErrorKind::Fetch);

    let snap = controller.snapshot().await;
    assert_eq!(snap.total_loaded, 3);
    assert_eq!(snap.next_page, 2);
    assert!(snap.has_more);
    assert_eq!(snap.error, Some(error));

    // Retry succeeds and clears the error.
    source.set_page(2, MockPage::Records(ids(&["x"])));
    assert!(controller.load_next().await.is_loaded());
    let snap = controller.snapshot().await;
    assert_eq!(snap.total_loaded, 4);
    assert!(snap.error.is_none());
    assert_eq!(source.calls(), vec![1, 2, 2]);
}

#[tokio::test]
async fn test_contract_violation_is_typed() {
    let source = MockPageSource::new().with_violation(1, "missing data");
    let controller = controller_with(&source, &MemoryRecordStore::new());

    let LoadOutcome::Failed(error) = controller.refresh().await else {
        panic!("expected failure");
    };
    assert_eq!(error.kind, ErrorKind::ContractViolation);
    assert_eq!(controller.snapshot().await.total_loaded, 0);
}

#[tokio::test]
async fn test_refresh_replaces_collection() {
    let source = MockPageSource::new()
        .with_page(1, ids(&["a", "b"]))
        .with_page(2, ids(&["c"]));
    let controller = controller_with(&source, &MemoryRecordStore::new());

    controller.load_next().await;
    controller.load_next().await;
    assert_eq!(controller.snapshot().await.total_loaded, 3);

    source.set_page(1, MockPage::Records(ids(&["z", "a"])));
    let outcome = controller.refresh().await;
    assert!(matches!(outcome, LoadOutcome::Loaded { page: 1, added: 2, .. }));

    let snap = controller.snapshot().await;
    assert_eq!(snap.ids(), vec!["z", "a"]);
    assert_eq!(snap.next_page, 2);
    assert!(snap.has_more);
}

#[tokio::test]
async fn test_refresh_after_exhaustion_and_error() {
    let source = MockPageSource::new().with_failure(1, "offline");
    let controller = controller_with(&source, &MemoryRecordStore::new());

    controller.refresh().await;
    assert!(controller.snapshot().await.error.is_some());

    source.set_page(1, MockPage::Records(vec![]));
    controller.refresh().await;
    let snap = controller.snapshot().await;
    assert!(snap.error.is_none());
    assert!(!snap.has_more);

    // Exhaustion blocks load_next but not refresh.
    assert_eq!(
        controller.load_next().await,
        LoadOutcome::Dropped(DropReason::Exhausted)
    );
    source.set_page(1, MockPage::Records(ids(&["back"])));
    assert!(controller.refresh().await.is_loaded());
    assert!(controller.snapshot().await.has_more);
}

// ---------------------------------------------------------------------------
// In-flight guard
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_refresh_while_loading_is_dropped() {
    let source = MockPageSource::new()
        .with_numbered_page(1, 20)
        .with_numbered_page(2, 5);
    let controller = controller_with(&source, &MemoryRecordStore::new());
    controller.load_next().await;

    let gate = source.hold_page(2);
    let (pending, (refreshed, during)) = tokio::join!(controller.load_next(), async {
        let refreshed = controller.refresh().await;
        let during = controller.snapshot().await;
        gate.release();
        (refreshed, during)
    });

    assert_eq!(refreshed, LoadOutcome::Dropped(DropReason::InFlight));
    assert!(during.loading);
    assert_eq!(during.total_loaded, 20);

    assert!(matches!(pending, LoadOutcome::Loaded { page: 2, added: 5, .. }));
    let after = controller.snapshot().await;
    assert_eq!(after.total_loaded, 25);
    assert!(!after.loading);
    assert_eq!(source.calls(), vec![1, 2]);
}

#[tokio::test]
async fn test_second_load_next_is_dropped_not_queued() {
    let source = MockPageSource::new().with_numbered_page(1, 2);
    let controller = controller_with(&source, &MemoryRecordStore::new());

    let gate = source.hold_page(1);
    let (first, second) = tokio::join!(controller.load_next(), async {
        let second = controller.load_next().await;
        gate.release();
        second
    });

    assert!(first.is_loaded());
    assert_eq!(second, LoadOutcome::Dropped(DropReason::InFlight));
    assert_eq!(source.fetch_count(), 1);
}

#[tokio::test]
async fn test_restart_policy_discards_superseded_load() {
    let source = MockPageSource::new()
        .with_page(1, ids(&["a", "b"]))
        .with_page(2, ids(&["c", "d"]));
    let config = ListingConfig::default().with_refresh_policy(RefreshPolicy::Restart);
    let controller = controller_with_config(&source, &MemoryRecordStore::new(), config);
    controller.load_next().await;

    source.set_page(1, MockPage::Records(ids(&["fresh"])));
    let gate = source.hold_page(2);
    let (pending, refreshed) = tokio::join!(controller.load_next(), async {
        let refreshed = controller.refresh().await;
        gate.release();
        refreshed
    });

    assert!(matches!(refreshed, LoadOutcome::Loaded { page: 1, .. }));
    assert_eq!(pending, LoadOutcome::Stale);

    let snap = controller.snapshot().await;
    assert_eq!(snap.ids(), vec!["fresh"]);
    assert_eq!(snap.next_page, 2);
}

#[tokio::test]
async fn test_reset_discards_in_flight_load() {
    let source = MockPageSource::new().with_page(1, ids(&["a"]));
    let controller = controller_with(&source, &MemoryRecordStore::new());

    let gate = source.hold_page(1);
    let (pending, _) = tokio::join!(controller.load_next(), async {
        controller.reset().await;
        gate.release();
    });

    assert_eq!(pending, LoadOutcome::Stale);
    assert_eq!(controller.snapshot().await.total_loaded, 0);
}

// ---------------------------------------------------------------------------
// Duplicate ids
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_duplicate_ids_kept_by_default() {
    let source = MockPageSource::new()
        .with_page(1, ids(&["a", "b"]))
        .with_page(2, ids(&["b", "c"]));
    let controller = controller_with(&source, &MemoryRecordStore::new());

    controller.load_next().await;
    controller.load_next().await;
    assert_eq!(controller.snapshot().await.ids(), vec!["a", "b", "b", "c"]);
}

#[tokio::test]
async fn test_duplicate_ids_skipped_when_deduping() {
    let source = MockPageSource::new()
        .with_page(1, ids(&["a", "b"]))
        .with_page(2, ids(&["b", "c"]));
    let config = ListingConfig::default().with_dedupe_ids(true);
    let controller = controller_with_config(&source, &MemoryRecordStore::new(), config);

    controller.load_next().await;
    let outcome = controller.load_next().await;
    assert!(matches!(outcome, LoadOutcome::Loaded { added: 1, .. }));
    assert_eq!(controller.snapshot().await.ids(), vec!["a", "b", "c"]);
}

// ---------------------------------------------------------------------------
// Search and filters
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_search_engineer() {
    let source = MockPageSource::new().with_page(
        1,
        vec![
            Record::new("1").with_title("Software Engineer"),
            Record::new("2").with_title("Sales Associate"),
        ],
    );
    let controller = controller_with(&source, &MemoryRecordStore::new());
    controller.load_next().await;

    controller.set_search_text("engineer").await;
    let snap = controller.snapshot().await;
    assert_eq!(snap.ids(), vec!["1"]);
    assert_eq!(snap.result_count, 1);
    assert_eq!(snap.total_loaded, 2);

    controller.clear_search().await;
    assert_eq!(controller.snapshot().await.result_count, 2);
    assert_eq!(source.fetch_count(), 1);
}

#[tokio::test]
async fn test_senior_filter() {
    let source = MockPageSource::new().with_page(
        1,
        vec![
            Record::new("1").with_experience("5+ years experience"),
            Record::new("2").with_experience("Entry level, fresher"),
        ],
    );
    let controller = controller_with(&source, &MemoryRecordStore::new());
    controller.load_next().await;

    controller
        .set_filters(FilterSet::new().with_experience(ExperienceLevel::Senior))
        .await;
    assert_eq!(controller.snapshot().await.ids(), vec!["1"]);
}

#[tokio::test]
async fn test_toggle_filter_selects_then_clears() {
    let source = MockPageSource::new().with_page(
        1,
        vec![
            Record::new("1").with_experience("Fresher"),
            Record::new("2").with_experience("Senior"),
        ],
    );
    let controller = controller_with(&source, &MemoryRecordStore::new());
    controller.load_next().await;

    let choice = FilterChoice::Experience(ExperienceLevel::Entry);
    let filters = controller.toggle_filter(choice).await;
    assert_eq!(filters.experience, Some(ExperienceLevel::Entry));
    assert_eq!(controller.snapshot().await.ids(), vec!["1"]);

    let filters = controller.toggle_filter(choice).await;
    assert!(filters.is_empty());
    assert_eq!(controller.snapshot().await.result_count, 2);
}

#[tokio::test]
async fn test_query_applies_to_later_pages() {
    let source = MockPageSource::new()
        .with_page(1, vec![Record::new("1").with_title("Cook")])
        .with_page(2, vec![Record::new("2").with_title("Head Cook"), Record::new("3")]);
    let controller = controller_with(&source, &MemoryRecordStore::new());

    controller.set_search_text("  COOK ").await;
    controller.load_next().await;
    controller.load_next().await;
    assert_eq!(controller.snapshot().await.ids(), vec!["1", "2"]);
}

// ---------------------------------------------------------------------------
// Bookmarks
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_hydrates_only_new_records() {
    let store = MemoryRecordStore::new()
        .with_saved(vec![Record::new("2-1")])
        .await;
    let source = MockPageSource::new()
        .with_numbered_page(1, 2)
        .with_numbered_page(2, 2);
    let controller = controller_with(&source, &store);

    controller.load_next().await;
    assert_eq!(store.exists_calls(), 2);
    controller.load_next().await;
    assert_eq!(store.exists_calls(), 4);

    let snap = controller.snapshot().await;
    assert!(snap.row("2-1").unwrap().saved);
    assert!(!snap.row("1-0").unwrap().saved);
}

#[tokio::test]
async fn test_partial_hydration_failure_is_reported() {
    let store = MemoryRecordStore::new();
    store.fail_on("1-1").await;
    let source = MockPageSource::new().with_numbered_page(1, 3);
    let controller = controller_with(&source, &store);

    let outcome = controller.load_next().await;
    let LoadOutcome::Loaded { unresolved, .. } = outcome else {
        panic!("expected loaded");
    };
    assert_eq!(unresolved, vec![RecordId::from("1-1")]);
    assert_eq!(controller.overlay().len().await, 2);
    assert_eq!(controller.snapshot().await.result_count, 3);
}

#[tokio::test]
async fn test_toggle_bookmark_round_trip() {
    let store = MemoryRecordStore::new();
    let source = MockPageSource::new().with_numbered_page(1, 2);
    let controller = controller_with(&source, &store);
    controller.load_next().await;
    let id = RecordId::from("1-0");

    assert!(controller.toggle_bookmark(&id).await.unwrap());
    assert!(store.contains(&id).await);
    assert!(controller.snapshot().await.row("1-0").unwrap().saved);

    assert!(!controller.toggle_bookmark(&id).await.unwrap());
    assert!(!store.contains(&id).await);
    assert!(!controller.snapshot().await.row("1-0").unwrap().saved);
}

#[tokio::test]
async fn test_toggle_storage_failure_leaves_flag() {
    let store = MemoryRecordStore::new();
    let source = MockPageSource::new().with_numbered_page(1, 1);
    let controller = controller_with(&source, &store);
    controller.load_next().await;

    let id = RecordId::from("1-0");
    store.fail_on("1-0").await;
    let err = controller.toggle_bookmark(&id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Storage);
    assert!(!controller.overlay().is_saved(&id).await);
    assert!(!store.contains(&id).await);

    store.heal().await;
    assert!(controller.toggle_bookmark(&id).await.unwrap());
}

#[tokio::test]
async fn test_toggle_does_not_change_displayed_subset() {
    let source = MockPageSource::new().with_page(
        1,
        vec![
            Record::new("1").with_title("Driver"),
            Record::new("2").with_title("Cashier"),
        ],
    );
    let controller = controller_with(&source, &MemoryRecordStore::new());
    controller.load_next().await;
    controller.set_search_text("driver").await;

    // A hidden record can still be toggled.
    assert!(controller.toggle_bookmark(&RecordId::from("2")).await.unwrap());
    let snap = controller.snapshot().await;
    assert_eq!(snap.ids(), vec!["1"]);

    let hidden = controller.record(&RecordId::from("2")).await.unwrap();
    assert!(hidden.saved);
}

#[tokio::test]
async fn test_resolve_bookmark_reads_store_once() {
    let store = MemoryRecordStore::new()
        .with_saved(vec![Record::new("77")])
        .await;
    let controller = controller_with(&MockPageSource::new(), &store);
    let id = RecordId::from("77");

    assert!(controller.resolve_bookmark(&id).await.unwrap());
    assert!(controller.resolve_bookmark(&id).await.unwrap());
    assert_eq!(store.exists_calls(), 1);
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_events_follow_state_changes() {
    let source = MockPageSource::new()
        .with_numbered_page(1, 2)
        .with_failure(2, "boom");
    let controller = controller_with(&source, &MemoryRecordStore::new());
    let mut rx = controller.subscribe();

    controller.load_next().await;
    controller.load_next().await;
    controller.toggle_bookmark(&RecordId::from("1-1")).await.unwrap();

    let mut types = Vec::new();
    while let Ok(envelope) = rx.try_recv() {
        assert_eq!(envelope.session_id, controller.session_id());
        types.push(envelope.event_type);
    }
    assert_eq!(
        types,
        vec!["page.loaded", "view.changed", "page.failed", "bookmark.changed"]
    );
}
