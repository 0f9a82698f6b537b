//! Listing events and the broadcast bus that carries them.
//!
//! The controller emits a [`ListingEvent`] after every observable state
//! change so a view layer can re-read its snapshot instead of polling.
//! Each emission is wrapped in an [`EventEnvelope`] carrying a UUIDv7 event
//! id and the originating listing session.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::error::ErrorKind;
use crate::models::RecordId;

/// Domain events emitted by a listing session.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ListingEvent {
    /// A page was applied to the accumulated collection.
    PageLoaded {
        page: u32,
        added: usize,
        replaced: bool,
        exhausted: bool,
    },
    /// A page load failed; the collection is unchanged.
    LoadFailed {
        page: u32,
        kind: ErrorKind,
        message: String,
    },
    /// A load request was dropped by the in-flight guard or exhaustion.
    LoadDropped { refresh: bool },
    /// A page arrived for a superseded generation and was discarded.
    StaleLoadDiscarded { page: u32, generation: u64 },
    /// The displayed subset was recomputed.
    ViewChanged { result_count: usize },
    /// A record's saved flag changed.
    BookmarkChanged { record_id: RecordId, saved: bool },
    /// Some ids could not be hydrated from the Record Store.
    HydrationFailed { record_ids: Vec<RecordId> },
}

impl ListingEvent {
    /// Dot-namespaced event name, e.g. `"page.loaded"`.
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::PageLoaded { .. } => "page.loaded",
            Self::LoadFailed { .. } => "page.failed",
            Self::LoadDropped { .. } => "page.dropped",
            Self::StaleLoadDiscarded { .. } => "page.stale",
            Self::ViewChanged { .. } => "view.changed",
            Self::BookmarkChanged { .. } => "bookmark.changed",
            Self::HydrationFailed { .. } => "bookmark.hydration_failed",
        }
    }
}

/// Envelope wrapping every emitted event.
#[derive(Debug, Clone, Serialize)]
pub struct EventEnvelope {
    /// UUIDv7, so envelopes sort by emission time.
    pub event_id: Uuid,
    pub event_type: &'static str,
    pub session_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub payload: ListingEvent,
}

impl EventEnvelope {
    pub fn new(session_id: Uuid, event: ListingEvent) -> Self {
        Self {
            event_id: Uuid::now_v7(),
            event_type: event.event_type(),
            session_id,
            occurred_at: Utc::now(),
            payload: event,
        }
    }
}

/// Broadcast bus for listing events.
///
/// Cloning shares the underlying channel. Events emitted while nobody is
/// subscribed are dropped.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<EventEnvelope>,
}

impl EventBus {
    /// Create a new event bus with the given buffer capacity (at least 1).
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Emit an event on behalf of a listing session.
    pub fn emit(&self, session_id: Uuid, event: ListingEvent) {
        let envelope = EventEnvelope::new(session_id, event);
        tracing::trace!(
            event_type = envelope.event_type,
            event_id = %envelope.event_id,
            session_id = %session_id,
            subscriber_count = self.tx.receiver_count(),
            "EventBus emit"
        );
        let _ = self.tx.send(envelope);
    }

    /// Subscribe to receive events. Each subscriber gets its own stream.
    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(crate::defaults::EVENT_BUS_CAPACITY)
    }
}
