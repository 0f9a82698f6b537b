//! Listing controller.
//!
//! Owns the accumulated collection, the page cursor and the exhaustion flag
//! of one listing session, and derives the displayed subset from the current
//! search text and filter set.
//!
//! The cursor is the page the next `load_next` will request. It starts at
//! the first page, advances by one after each applied page and returns to
//! the first page on refresh. At most one page load is in flight; each load
//! is tagged with the generation it started under and its result is
//! discarded if the generation has moved on by the time it lands.
//!
//! The state lock is never held across a fetch or a store call.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info, warn};
use uuid::Uuid;

use jobdeck_core::defaults::FIRST_PAGE;
use jobdeck_core::{
    Error, ErrorKind, EventBus, EventEnvelope, FilterChoice, FilterSet, ListingEvent, PageSource,
    Record, RecordId, RecordStore, Result,
};
use jobdeck_search::filter_records;

use crate::config::{ListingConfig, RefreshPolicy};
use crate::overlay::BookmarkOverlay;
use crate::view::{ListingRow, ListingSnapshot, LoadError};

/// Why a load request did not start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// Another load is in flight.
    InFlight,
    /// The last page was empty; only a refresh loads again.
    Exhausted,
}

/// Result of a `load_next` or `refresh` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The page was applied to the collection.
    Loaded {
        page: u32,
        added: usize,
        exhausted: bool,
        /// Ids whose bookmark status could not be read.
        unresolved: Vec<RecordId>,
    },
    Dropped(DropReason),
    /// Superseded by a newer generation; nothing was applied.
    Stale,
    /// The fetch failed; the collection and cursor are unchanged.
    Failed(LoadError),
}

impl LoadOutcome {
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded { .. })
    }
}

struct ListingState {
    records: Vec<Arc<Record>>,
    /// Indices into `records` that pass the current search and filters.
    displayed: Vec<usize>,
    cursor: u32,
    exhausted: bool,
    generation: u64,
    /// Generation of the load currently in flight.
    in_flight: Option<u64>,
    error: Option<LoadError>,
    search_text: String,
    filters: FilterSet,
}

impl ListingState {
    fn new() -> Self {
        Self {
            records: Vec::new(),
            displayed: Vec::new(),
            cursor: FIRST_PAGE,
            exhausted: false,
            generation: 0,
            in_flight: None,
            error: None,
            search_text: String::new(),
            filters: FilterSet::default(),
        }
    }

    fn recompute(&mut self) -> usize {
        self.displayed = filter_records(
            self.records.iter().map(|r| r.as_ref()),
            &self.search_text,
            &self.filters,
        );
        self.displayed.len()
    }

    fn find(&self, id: &RecordId) -> Option<Arc<Record>> {
        self.records.iter().find(|r| &r.id == id).cloned()
    }
}

/// Listing session over a Page Source and a Record Store.
pub struct ListingController {
    source: Arc<dyn PageSource>,
    overlay: Arc<BookmarkOverlay>,
    config: ListingConfig,
    state: Mutex<ListingState>,
    events: EventBus,
    session_id: Uuid,
}

impl ListingController {
    pub fn new(source: Arc<dyn PageSource>, store: Arc<dyn RecordStore>) -> Self {
        Self::with_config(source, store, ListingConfig::default())
    }

    pub fn with_config(
        source: Arc<dyn PageSource>,
        store: Arc<dyn RecordStore>,
        config: ListingConfig,
    ) -> Self {
        let overlay =
            Arc::new(BookmarkOverlay::new(store).with_concurrency(config.hydrate_concurrency));
        let session_id = Uuid::now_v7();
        debug!(
            subsystem = "engine",
            component = "listing",
            session_id = %session_id,
            source = source.name(),
            refresh_policy = %config.refresh_policy,
            dedupe_ids = config.dedupe_ids,
            "Listing session created"
        );
        Self {
            source,
            overlay,
            events: EventBus::new(config.event_capacity),
            config,
            state: Mutex::new(ListingState::new()),
            session_id,
        }
    }

    /// Emit events on a shared bus instead of the session's own.
    pub fn with_event_bus(mut self, events: EventBus) -> Self {
        self.events = events;
        self
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn config(&self) -> &ListingConfig {
        &self.config
    }

    pub fn overlay(&self) -> &Arc<BookmarkOverlay> {
        &self.overlay
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.events.subscribe()
    }

    /// Load the page at the cursor and append it.
    pub async fn load_next(&self) -> LoadOutcome {
        self.load(false).await
    }

    /// Load the first page and replace the collection with it.
    pub async fn refresh(&self) -> LoadOutcome {
        self.load(true).await
    }

    async fn load(&self, refresh: bool) -> LoadOutcome {
        let (page, generation) = {
            let mut state = self.state.lock().await;
            if state.in_flight.is_some() {
                if refresh && self.config.refresh_policy == RefreshPolicy::Restart {
                    state.generation += 1;
                    debug!(
                        session_id = %self.session_id,
                        generation = state.generation,
                        "Refresh supersedes in-flight load"
                    );
                } else {
                    debug!(session_id = %self.session_id, refresh, "Load dropped, another load in flight");
                    self.emit(ListingEvent::LoadDropped { refresh });
                    return LoadOutcome::Dropped(DropReason::InFlight);
                }
            } else if !refresh && state.exhausted {
                debug!(session_id = %self.session_id, "Load dropped, source exhausted");
                self.emit(ListingEvent::LoadDropped { refresh });
                return LoadOutcome::Dropped(DropReason::Exhausted);
            }

            state.error = None;
            state.in_flight = Some(state.generation);
            let page = if refresh { FIRST_PAGE } else { state.cursor };
            (page, state.generation)
        };

        let start = Instant::now();
        let result = self.source.fetch(page).await;

        let mut state = self.state.lock().await;
        if state.in_flight == Some(generation) {
            state.in_flight = None;
        }
        if state.generation != generation {
            debug!(
                session_id = %self.session_id,
                page,
                generation,
                current_generation = state.generation,
                "Stale page discarded"
            );
            drop(state);
            self.emit(ListingEvent::StaleLoadDiscarded { page, generation });
            return LoadOutcome::Stale;
        }

        let records = match result {
            Ok(records) => records,
            Err(e) => {
                let error = LoadError::from(&e);
                warn!(
                    subsystem = "engine",
                    component = "listing",
                    session_id = %self.session_id,
                    page,
                    refresh,
                    contract_violation = error.kind == ErrorKind::ContractViolation,
                    error = %e,
                    "Page load failed"
                );
                state.error = Some(error.clone());
                drop(state);
                self.emit(ListingEvent::LoadFailed {
                    page,
                    kind: error.kind,
                    message: error.message.clone(),
                });
                return LoadOutcome::Failed(error);
            }
        };

        let exhausted = records.is_empty();
        if refresh {
            state.records.clear();
        }
        let new_ids = self.append(&mut state, records);
        state.cursor = page + 1;
        state.exhausted = exhausted;
        let result_count = state.recompute();
        let total = state.records.len();
        drop(state);

        info!(
            subsystem = "engine",
            component = "listing",
            session_id = %self.session_id,
            page,
            refresh,
            page_size = new_ids.len(),
            total,
            exhausted,
            result_count,
            duration_ms = start.elapsed().as_millis() as u64,
            "Page applied"
        );
        self.emit(ListingEvent::PageLoaded {
            page,
            added: new_ids.len(),
            replaced: refresh,
            exhausted,
        });
        self.emit(ListingEvent::ViewChanged { result_count });

        let report = self.overlay.hydrate(&new_ids).await;
        let unresolved = report.failed_ids();
        if !unresolved.is_empty() {
            self.emit(ListingEvent::HydrationFailed {
                record_ids: unresolved.clone(),
            });
        }

        LoadOutcome::Loaded {
            page,
            added: new_ids.len(),
            exhausted,
            unresolved,
        }
    }

    /// Append a page, returning the ids of the records actually added.
    fn append(&self, state: &mut ListingState, records: Vec<Record>) -> Vec<RecordId> {
        let mut seen: HashSet<RecordId> = state.records.iter().map(|r| r.id.clone()).collect();
        let mut added = Vec::with_capacity(records.len());
        for record in records {
            if !seen.insert(record.id.clone()) {
                warn!(
                    session_id = %self.session_id,
                    record_id = %record.id,
                    deduped = self.config.dedupe_ids,
                    "Duplicate record id from page source"
                );
                if self.config.dedupe_ids {
                    continue;
                }
            }
            added.push(record.id.clone());
            state.records.push(Arc::new(record));
        }
        added
    }

    /// Drop the collection and supersede any in-flight load.
    pub async fn reset(&self) {
        let mut state = self.state.lock().await;
        let generation = state.generation + 1;
        let search_text = std::mem::take(&mut state.search_text);
        let filters = state.filters;
        *state = ListingState::new();
        state.generation = generation;
        state.search_text = search_text;
        state.filters = filters;
        drop(state);
        debug!(session_id = %self.session_id, generation, "Listing reset");
        self.emit(ListingEvent::ViewChanged { result_count: 0 });
    }

    pub async fn set_search_text(&self, text: impl Into<String>) {
        let mut state = self.state.lock().await;
        state.search_text = text.into();
        let result_count = state.recompute();
        drop(state);
        debug!(session_id = %self.session_id, result_count, "Search text changed");
        self.emit(ListingEvent::ViewChanged { result_count });
    }

    pub async fn clear_search(&self) {
        self.set_search_text(String::new()).await;
    }

    pub async fn set_filters(&self, filters: FilterSet) {
        let mut state = self.state.lock().await;
        state.filters = filters;
        let result_count = state.recompute();
        drop(state);
        debug!(
            session_id = %self.session_id,
            active_filters = filters.active_count(),
            result_count,
            "Filters changed"
        );
        self.emit(ListingEvent::ViewChanged { result_count });
    }

    /// Select an option, or clear its slot if it is already selected.
    pub async fn toggle_filter(&self, choice: FilterChoice) -> FilterSet {
        let mut filters = self.state.lock().await.filters;
        filters.toggle(choice);
        self.set_filters(filters).await;
        filters
    }

    /// Flip the saved flag of a loaded record. Returns the new flag.
    ///
    /// The displayed subset is not recomputed; bookmark state is not a
    /// filter predicate.
    pub async fn toggle_bookmark(&self, id: &RecordId) -> Result<bool> {
        let record = self
            .state
            .lock()
            .await
            .find(id)
            .ok_or_else(|| Error::NotFound(format!("record {} is not loaded", id)))?;

        match self.overlay.toggle(id, &record).await {
            Ok(saved) => {
                info!(
                    subsystem = "engine",
                    component = "listing",
                    session_id = %self.session_id,
                    record_id = %id,
                    saved,
                    "Bookmark toggled"
                );
                self.emit(ListingEvent::BookmarkChanged {
                    record_id: id.clone(),
                    saved,
                });
                Ok(saved)
            }
            Err(e) => {
                warn!(
                    subsystem = "engine",
                    component = "listing",
                    session_id = %self.session_id,
                    record_id = %id,
                    error = %e,
                    "Bookmark toggle failed"
                );
                Err(e)
            }
        }
    }

    /// A loaded record with its saved flag, whether or not it is displayed.
    pub async fn record(&self, id: &RecordId) -> Option<ListingRow> {
        let record = self.state.lock().await.find(id)?;
        let saved = self.overlay.is_saved(id).await;
        Some(ListingRow { record, saved })
    }

    /// Read the saved status of one id from the store if it is not known yet.
    pub async fn resolve_bookmark(&self, id: &RecordId) -> Result<bool> {
        self.overlay.resolve(id).await
    }

    pub async fn snapshot(&self) -> ListingSnapshot {
        let state = self.state.lock().await;
        let flags = self
            .overlay
            .saved_flags(state.displayed.iter().map(|&i| &state.records[i].id))
            .await;
        let rows = state
            .displayed
            .iter()
            .zip(flags)
            .map(|(&i, saved)| ListingRow {
                record: state.records[i].clone(),
                saved,
            })
            .collect();

        ListingSnapshot {
            rows,
            loading: state.in_flight.is_some(),
            error: state.error.clone(),
            has_more: !state.exhausted,
            result_count: state.displayed.len(),
            total_loaded: state.records.len(),
            search_text: state.search_text.clone(),
            filters: state.filters,
            next_page: state.cursor,
        }
    }

    fn emit(&self, event: ListingEvent) {
        self.events.emit(self.session_id, event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jobdeck_db::MemoryRecordStore;
    use jobdeck_source::MockPageSource;

    fn controller(source: MockPageSource) -> ListingController {
        ListingController::new(Arc::new(source), Arc::new(MemoryRecordStore::new()))
    }

    #[tokio::test]
    async fn test_initial_snapshot() {
        let snap = controller(MockPageSource::new()).snapshot().await;
        assert!(snap.rows.is_empty());
        assert!(snap.has_more);
        assert!(!snap.loading);
        assert_eq!(snap.next_page, FIRST_PAGE);
    }

    #[tokio::test]
    async fn test_cursor_advances_per_page() {
        let source = MockPageSource::new()
            .with_numbered_page(1, 2)
            .with_numbered_page(2, 2);
        let controller = controller(source.clone());

        controller.load_next().await;
        controller.load_next().await;

        assert_eq!(source.calls(), vec![1, 2]);
        let snap = controller.snapshot().await;
        assert_eq!(snap.total_loaded, 4);
        assert_eq!(snap.next_page, 3);
    }

    #[tokio::test]
    async fn test_reset_supersedes_and_keeps_query() {
        let controller = controller(MockPageSource::new().with_numbered_page(1, 3));
        controller.set_search_text("listing 1").await;
        controller.load_next().await;
        controller.reset().await;

        let snap = controller.snapshot().await;
        assert_eq!(snap.total_loaded, 0);
        assert_eq!(snap.search_text, "listing 1");
        assert_eq!(snap.next_page, FIRST_PAGE);
    }

    #[tokio::test]
    async fn test_zero_event_capacity_still_builds() {
        let config = ListingConfig {
            event_capacity: 0,
            ..ListingConfig::default()
        };
        let controller = ListingController::with_config(
            Arc::new(MockPageSource::new().with_numbered_page(1, 1)),
            Arc::new(MemoryRecordStore::new()),
            config,
        );
        let mut rx = controller.subscribe();
        controller.load_next().await;
        assert!(rx.try_recv().is_ok());
    }

    #[tokio::test]
    async fn test_toggle_unknown_record_is_not_found() {
        let controller = controller(MockPageSource::new());
        let err = controller
            .toggle_bookmark(&RecordId::from("ghost"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }
}
