//! Bookmark overlay.
//!
//! In-memory map of record id to saved flag, filled lazily from a
//! [`RecordStore`]. An id is present once its status has been read (or
//! written) at least once; absent ids read as not saved.
//!
//! Hydration merges with insert-if-absent, so a toggle that lands while a
//! hydration query is outstanding is never overwritten by the older read.
//! Toggles on the same id are serialized; toggles on distinct ids run
//! concurrently.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Instant;

use futures::stream::{self, StreamExt};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, warn};

use jobdeck_core::defaults::HYDRATE_CONCURRENCY;
use jobdeck_core::{Record, RecordId, RecordStore, Result};

/// Outcome of a [`BookmarkOverlay::hydrate`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HydrationReport {
    /// Ids whose status was read from the store and merged.
    pub resolved: Vec<RecordId>,
    /// Ids already present in the overlay; no query issued.
    pub skipped: usize,
    /// Ids read from the store but not merged, because a newer value
    /// arrived first.
    pub superseded: Vec<RecordId>,
    /// Ids whose store query failed, with the error message.
    pub failed: Vec<(RecordId, String)>,
}

impl HydrationReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn failed_ids(&self) -> Vec<RecordId> {
        self.failed.iter().map(|(id, _)| id.clone()).collect()
    }
}

pub struct BookmarkOverlay {
    store: Arc<dyn RecordStore>,
    flags: RwLock<HashMap<RecordId, bool>>,
    id_locks: Mutex<HashMap<RecordId, Arc<Mutex<()>>>>,
    concurrency: usize,
}

impl BookmarkOverlay {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            flags: RwLock::new(HashMap::new()),
            id_locks: Mutex::new(HashMap::new()),
            concurrency: HYDRATE_CONCURRENCY,
        }
    }

    /// Bound the number of concurrent store reads during hydration.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn store(&self) -> &Arc<dyn RecordStore> {
        &self.store
    }

    /// Read the status of every id not yet in the overlay and merge the
    /// results in one step once all queries have resolved.
    pub async fn hydrate(&self, ids: &[RecordId]) -> HydrationReport {
        let start = Instant::now();
        let mut report = HydrationReport::default();

        let pending: Vec<RecordId> = {
            let flags = self.flags.read().await;
            let mut seen = HashSet::new();
            ids.iter()
                .filter(|id| {
                    if flags.contains_key(*id) {
                        report.skipped += 1;
                        false
                    } else {
                        seen.insert(*id)
                    }
                })
                .cloned()
                .collect()
        };

        if pending.is_empty() {
            return report;
        }

        let store = &self.store;
        let results: Vec<(RecordId, Result<bool>)> = stream::iter(pending)
            .map(|id| async move {
                let result = store.exists(&id).await;
                (id, result)
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        let mut flags = self.flags.write().await;
        for (id, result) in results {
            match result {
                Ok(saved) => match flags.entry(id) {
                    Entry::Vacant(slot) => {
                        report.resolved.push(slot.key().clone());
                        slot.insert(saved);
                    }
                    // A toggle landed while the read was outstanding.
                    Entry::Occupied(slot) => report.superseded.push(slot.key().clone()),
                },
                Err(e) => {
                    warn!(
                        subsystem = "engine",
                        component = "bookmark_overlay",
                        op = "hydrate",
                        record_id = %id,
                        error = %e,
                        "Bookmark status query failed"
                    );
                    report.failed.push((id, e.to_string()));
                }
            }
        }
        drop(flags);

        debug!(
            subsystem = "engine",
            component = "bookmark_overlay",
            op = "hydrate",
            id_count = ids.len(),
            resolved = report.resolved.len(),
            failed = report.failed.len(),
            skipped = report.skipped,
            superseded = report.superseded.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Hydration complete"
        );
        report
    }

    /// Flip the saved state of `id`, writing through to the store first.
    ///
    /// Returns the new flag. On store failure the overlay is unchanged.
    /// An id never read before is resolved against the store so the flip
    /// starts from the persisted state.
    pub async fn toggle(&self, id: &RecordId, snapshot: &Record) -> Result<bool> {
        let lock = self.id_lock(id).await;
        let result = {
            let _guard = lock.lock().await;
            self.toggle_locked(id, snapshot).await
        };
        self.release_id_lock(id, lock).await;
        result
    }

    async fn toggle_locked(&self, id: &RecordId, snapshot: &Record) -> Result<bool> {
        let known = self.flags.read().await.get(id).copied();
        let current = match known {
            Some(saved) => saved,
            None => self.store.exists(id).await?,
        };

        if current {
            self.store.remove(id).await?;
        } else {
            self.store.put(id, snapshot).await?;
        }

        let saved = !current;
        self.flags.write().await.insert(id.clone(), saved);
        debug!(
            subsystem = "engine",
            component = "bookmark_overlay",
            op = "toggle",
            record_id = %id,
            saved,
            "Bookmark toggled"
        );
        Ok(saved)
    }

    /// Saved flag for `id`; unknown ids read as `false`.
    pub async fn is_saved(&self, id: &RecordId) -> bool {
        self.flags.read().await.get(id).copied().unwrap_or(false)
    }

    /// Flag for `id` if its status has been read, `None` if unknown.
    pub async fn known(&self, id: &RecordId) -> Option<bool> {
        self.flags.read().await.get(id).copied()
    }

    /// Flags for several ids in order, unknown as `false`.
    pub async fn saved_flags<'a, I>(&self, ids: I) -> Vec<bool>
    where
        I: IntoIterator<Item = &'a RecordId>,
    {
        let flags = self.flags.read().await;
        ids.into_iter()
            .map(|id| flags.get(id).copied().unwrap_or(false))
            .collect()
    }

    /// Status of a single id, querying the store when unknown.
    pub async fn resolve(&self, id: &RecordId) -> Result<bool> {
        if let Some(saved) = self.known(id).await {
            return Ok(saved);
        }
        let saved = self.store.exists(id).await?;
        Ok(*self.flags.write().await.entry(id.clone()).or_insert(saved))
    }

    /// Number of ids with a known status.
    pub async fn len(&self) -> usize {
        self.flags.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    async fn id_lock(&self, id: &RecordId) -> Arc<Mutex<()>> {
        self.id_locks
            .lock()
            .await
            .entry(id.clone())
            .or_default()
            .clone()
    }

    async fn release_id_lock(&self, id: &RecordId, lock: Arc<Mutex<()>>) {
        let mut locks = self.id_locks.lock().await;
        // Map entry plus ours: nobody else is waiting on this id.
        if Arc::strong_count(&lock) <= 2 {
            locks.remove(id);
        }
    }
}
