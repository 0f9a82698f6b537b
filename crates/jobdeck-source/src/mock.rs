//! Scripted Page Source for deterministic testing.
//!
//! Pages are scripted up front (or replaced mid-test); unscripted pages come
//! back empty, which the listing controller treats as exhaustion. A page can
//! be held behind a [`PageGate`] so tests can interleave other operations
//! while a fetch is in flight.
//!
//! # Example
//!
//! ```rust,ignore
//! use jobdeck_source::mock::MockPageSource;
//!
//! let source = MockPageSource::new().with_numbered_page(1, 20);
//! let gate = source.hold_page(2);
//! // ... start a load of page 2, do other work ...
//! gate.release();
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Notify;

use jobdeck_core::{Error, PageSource, Record, Result};

/// Scripted response for one page.
#[derive(Debug, Clone)]
pub enum MockPage {
    Records(Vec<Record>),
    /// Transport-style failure.
    Fail(String),
    /// Malformed-shape failure.
    Violation(String),
}

/// Handle that releases a held page fetch.
#[derive(Clone)]
pub struct PageGate {
    notify: Arc<Notify>,
}

impl PageGate {
    /// Let the held fetch complete. Safe to call before the fetch starts.
    pub fn release(&self) {
        self.notify.notify_one();
    }
}

#[derive(Default)]
struct State {
    pages: HashMap<u32, MockPage>,
    gates: HashMap<u32, Arc<Notify>>,
    calls: Vec<u32>,
}

/// Page Source with scripted pages and a call log.
#[derive(Clone, Default)]
pub struct MockPageSource {
    state: Arc<Mutex<State>>,
    latency: Option<Duration>,
}

impl MockPageSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script `page` to return `records`.
    pub fn with_page(self, page: u32, records: Vec<Record>) -> Self {
        self.set_page(page, MockPage::Records(records));
        self
    }

    /// Script `page` with `count` generated records whose ids are `"{page}-{i}"`.
    pub fn with_numbered_page(self, page: u32, count: usize) -> Self {
        self.with_page(page, numbered_records(page, count))
    }

    /// Script `page` to fail with a fetch error.
    pub fn with_failure(self, page: u32, message: impl Into<String>) -> Self {
        self.set_page(page, MockPage::Fail(message.into()));
        self
    }

    /// Script `page` to fail with a contract violation.
    pub fn with_violation(self, page: u32, message: impl Into<String>) -> Self {
        self.set_page(page, MockPage::Violation(message.into()));
        self
    }

    /// Delay every fetch.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Replace the script for `page`. Visible to clones.
    pub fn set_page(&self, page: u32, response: MockPage) {
        if let Ok(mut state) = self.state.lock() {
            state.pages.insert(page, response);
        }
    }

    /// Hold the next fetch of `page` until the returned gate is released.
    pub fn hold_page(&self, page: u32) -> PageGate {
        let notify = Arc::new(Notify::new());
        if let Ok(mut state) = self.state.lock() {
            state.gates.insert(page, notify.clone());
        }
        PageGate { notify }
    }

    /// Pages requested so far, in call order.
    pub fn calls(&self) -> Vec<u32> {
        self.state
            .lock()
            .map(|state| state.calls.clone())
            .unwrap_or_default()
    }

    pub fn fetch_count(&self) -> usize {
        self.calls().len()
    }
}

/// Generate `count` records for `page` with predictable ids and titles.
pub fn numbered_records(page: u32, count: usize) -> Vec<Record> {
    (0..count)
        .map(|i| {
            Record::new(format!("{}-{}", page, i))
                .with_title(format!("Listing {} of page {}", i, page))
                .with_company("Acme")
        })
        .collect()
}

#[async_trait]
impl PageSource for MockPageSource {
    async fn fetch(&self, page: u32) -> Result<Vec<Record>> {
        if page == 0 {
            return Err(Error::InvalidInput("pages are 1-based".to_string()));
        }

        // One-shot gate: taken out of the map so a later fetch is not held.
        let gate = {
            let mut state = self
                .state
                .lock()
                .map_err(|_| Error::Fetch("mock state poisoned".to_string()))?;
            state.calls.push(page);
            state.gates.remove(&page)
        };

        if let Some(gate) = gate {
            gate.notified().await;
        }
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        let scripted = self
            .state
            .lock()
            .map_err(|_| Error::Fetch("mock state poisoned".to_string()))?
            .pages
            .get(&page)
            .cloned();

        match scripted {
            Some(MockPage::Records(records)) => Ok(records),
            Some(MockPage::Fail(message)) => Err(Error::Fetch(message)),
            Some(MockPage::Violation(message)) => Err(Error::ContractViolation(message)),
            None => Ok(Vec::new()),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}
