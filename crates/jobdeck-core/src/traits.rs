//! Collaborator traits for jobdeck.
//!
//! The listing engine talks to exactly two external collaborators: a paged
//! source of records and a key-value store for saved records. Both are
//! object-safe so the engine can hold them as `Arc<dyn ..>`.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Record, RecordId};

// =============================================================================
// PAGE SOURCE
// =============================================================================

/// Remote paged fetch capability.
///
/// `fetch(page)` returns the ordered records of a 1-based page. An empty
/// page signals exhaustion. Transport failures are [`crate::Error::Fetch`];
/// malformed payloads are [`crate::Error::ContractViolation`].
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch one page of records.
    async fn fetch(&self, page: u32) -> Result<Vec<Record>>;

    /// Short name used in logs.
    fn name(&self) -> &str {
        "page_source"
    }
}

// =============================================================================
// RECORD STORE
// =============================================================================

/// Persistent key-value store of saved records, keyed by record id.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Check whether a record is saved.
    async fn exists(&self, id: &RecordId) -> Result<bool>;

    /// Save a full record snapshot. Overwrites an existing entry.
    async fn put(&self, id: &RecordId, record: &Record) -> Result<()>;

    /// Remove a saved record. Removing an absent id is not an error.
    async fn remove(&self, id: &RecordId) -> Result<()>;

    /// List every saved record, most recently saved first.
    async fn list_saved(&self) -> Result<Vec<Record>>;
}
