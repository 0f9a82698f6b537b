//! Read-only view of a listing session.

use std::sync::Arc;

use serde::{Serialize, Serializer};

use jobdeck_core::{Error, ErrorKind, FilterSet, Record};

/// Load failure as shown to the view layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadError {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<&Error> for LoadError {
    fn from(e: &Error) -> Self {
        Self {
            kind: e.kind(),
            message: e.to_string(),
        }
    }
}

/// One displayed record with its saved flag.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingRow {
    pub record: Arc<Record>,
    pub saved: bool,
}

#[derive(Serialize)]
struct RowRef<'a> {
    #[serde(flatten)]
    record: &'a Record,
    saved: bool,
}

impl Serialize for ListingRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        RowRef {
            record: self.record.as_ref(),
            saved: self.saved,
        }
        .serialize(serializer)
    }
}

/// Snapshot handed to the view layer.
#[derive(Debug, Clone, Serialize)]
pub struct ListingSnapshot {
    /// Displayed subset, in collection order.
    pub rows: Vec<ListingRow>,
    pub loading: bool,
    pub error: Option<LoadError>,
    pub has_more: bool,
    pub result_count: usize,
    /// Size of the accumulated collection before filtering.
    pub total_loaded: usize,
    pub search_text: String,
    pub filters: FilterSet,
    /// Page the next `load_next` will request.
    pub next_page: u32,
}

impl ListingSnapshot {
    pub fn ids(&self) -> Vec<&str> {
        self.rows.iter().map(|row| row.record.id.as_str()).collect()
    }

    pub fn row(&self, id: &str) -> Option<&ListingRow> {
        self.rows.iter().find(|row| row.record.id.as_str() == id)
    }
}
