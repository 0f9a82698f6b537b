//! In-memory Record Store.
//!
//! Used by tests and by embedders that do not need persistence. Supports
//! failure injection per id (or globally), simulated latency, and counters
//! for store reads so callers can assert how many queries were issued.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use jobdeck_core::{Error, Record, RecordId, RecordStore, Result};

#[derive(Default)]
struct Inner {
    records: RwLock<HashMap<RecordId, (u64, Record)>>,
    failing: RwLock<HashSet<RecordId>>,
    fail_all: std::sync::atomic::AtomicBool,
    seq: AtomicU64,
    exists_calls: AtomicUsize,
    put_calls: AtomicUsize,
    remove_calls: AtomicUsize,
    latency_ms: AtomicU64,
}

/// Cloneable handle to a shared in-memory store.
#[derive(Clone, Default)]
pub struct MemoryRecordStore {
    inner: Arc<Inner>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate with saved records.
    pub async fn with_saved(self, records: impl IntoIterator<Item = Record>) -> Self {
        {
            let mut map = self.inner.records.write().await;
            for record in records {
                let seq = self.inner.seq.fetch_add(1, Ordering::SeqCst);
                map.insert(record.id.clone(), (seq, record));
            }
        }
        self
    }

    /// Every operation touching `id` fails until [`Self::heal`] is called.
    pub async fn fail_on(&self, id: impl Into<RecordId>) {
        self.inner.failing.write().await.insert(id.into());
    }

    /// Every operation fails while set.
    pub fn fail_all(&self, fail: bool) {
        self.inner.fail_all.store(fail, Ordering::SeqCst);
    }

    /// Clear all injected failures.
    pub async fn heal(&self) {
        self.inner.failing.write().await.clear();
        self.fail_all(false);
    }

    /// Delay every operation by `latency`.
    pub fn set_latency(&self, latency: Duration) {
        self.inner
            .latency_ms
            .store(latency.as_millis() as u64, Ordering::SeqCst);
    }

    pub fn exists_calls(&self) -> usize {
        self.inner.exists_calls.load(Ordering::SeqCst)
    }

    pub fn put_calls(&self) -> usize {
        self.inner.put_calls.load(Ordering::SeqCst)
    }

    pub fn remove_calls(&self) -> usize {
        self.inner.remove_calls.load(Ordering::SeqCst)
    }

    pub async fn contains(&self, id: &RecordId) -> bool {
        self.inner.records.read().await.contains_key(id)
    }

    pub async fn len(&self) -> usize {
        self.inner.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    async fn before_op(&self, id: &RecordId, op: &str) -> Result<()> {
        let latency = self.inner.latency_ms.load(Ordering::SeqCst);
        if latency > 0 {
            tokio::time::sleep(Duration::from_millis(latency)).await;
        }
        if self.inner.fail_all.load(Ordering::SeqCst)
            || self.inner.failing.read().await.contains(id)
        {
            return Err(Error::Storage(format!("injected {} failure for {}", op, id)));
        }
        Ok(())
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn exists(&self, id: &RecordId) -> Result<bool> {
        self.inner.exists_calls.fetch_add(1, Ordering::SeqCst);
        self.before_op(id, "exists").await?;
        Ok(self.inner.records.read().await.contains_key(id))
    }

    async fn put(&self, id: &RecordId, record: &Record) -> Result<()> {
        self.inner.put_calls.fetch_add(1, Ordering::SeqCst);
        self.before_op(id, "put").await?;
        let seq = self.inner.seq.fetch_add(1, Ordering::SeqCst);
        self.inner
            .records
            .write()
            .await
            .insert(id.clone(), (seq, record.clone()));
        Ok(())
    }

    async fn remove(&self, id: &RecordId) -> Result<()> {
        self.inner.remove_calls.fetch_add(1, Ordering::SeqCst);
        self.before_op(id, "remove").await?;
        self.inner.records.write().await.remove(id);
        Ok(())
    }

    async fn list_saved(&self) -> Result<Vec<Record>> {
        if self.inner.fail_all.load(Ordering::SeqCst) {
            return Err(Error::Storage("injected list failure".to_string()));
        }
        let map = self.inner.records.read().await;
        let mut entries: Vec<_> = map.values().cloned().collect();
        entries.sort_by(|a, b| b.0.cmp(&a.0));
        Ok(entries.into_iter().map(|(_, r)| r).collect())
    }
}
