//! Listing session configuration.
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `JOBDECK_REFRESH_POLICY` | `drop` | `drop` or `restart` a refresh issued during a load |
//! | `JOBDECK_DEDUPE_IDS` | `false` | Skip records whose id is already in the collection |
//! | `JOBDECK_HYDRATE_CONCURRENCY` | `8` | Concurrent Record Store reads per hydration |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use jobdeck_core::defaults::{EVENT_BUS_CAPACITY, HYDRATE_CONCURRENCY};
use jobdeck_core::Error;

/// What a `refresh()` does while another load is in flight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshPolicy {
    /// Drop the refresh; the pending load completes normally.
    #[default]
    Drop,
    /// Start the refresh immediately and discard the pending load when it lands.
    Restart,
}

impl fmt::Display for RefreshPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Drop => write!(f, "drop"),
            Self::Restart => write!(f, "restart"),
        }
    }
}

impl FromStr for RefreshPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "drop" => Ok(Self::Drop),
            "restart" => Ok(Self::Restart),
            other => Err(Error::Config(format!(
                "unknown refresh policy '{}', expected drop or restart",
                other
            ))),
        }
    }
}

/// Configuration for a [`crate::ListingController`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingConfig {
    pub refresh_policy: RefreshPolicy,
    /// Skip incoming records whose id is already accumulated.
    pub dedupe_ids: bool,
    /// Upper bound on concurrent `exists` queries while hydrating.
    pub hydrate_concurrency: usize,
    /// Buffer size of the event bus created for the session.
    pub event_capacity: usize,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            refresh_policy: RefreshPolicy::default(),
            dedupe_ids: false,
            hydrate_concurrency: HYDRATE_CONCURRENCY,
            event_capacity: EVENT_BUS_CAPACITY,
        }
    }
}

impl ListingConfig {
    /// Create configuration from environment variables.
    pub fn from_env() -> Self {
        let refresh_policy = match std::env::var("JOBDECK_REFRESH_POLICY") {
            Ok(v) => v.parse().unwrap_or_else(|e| {
                warn!(error = %e, "Invalid JOBDECK_REFRESH_POLICY, using default");
                RefreshPolicy::default()
            }),
            Err(_) => RefreshPolicy::default(),
        };

        let dedupe_ids = std::env::var("JOBDECK_DEDUPE_IDS")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        let hydrate_concurrency = std::env::var("JOBDECK_HYDRATE_CONCURRENCY")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(HYDRATE_CONCURRENCY)
            .max(1);

        debug!(
            subsystem = "engine",
            component = "config",
            refresh_policy = %refresh_policy,
            dedupe_ids,
            hydrate_concurrency,
            "Loaded listing config"
        );

        Self {
            refresh_policy,
            dedupe_ids,
            hydrate_concurrency,
            event_capacity: EVENT_BUS_CAPACITY,
        }
    }

    pub fn with_refresh_policy(mut self, policy: RefreshPolicy) -> Self {
        self.refresh_policy = policy;
        self
    }

    pub fn with_dedupe_ids(mut self, dedupe: bool) -> Self {
        self.dedupe_ids = dedupe;
        self
    }

    /// Clamped to at least 1.
    pub fn with_hydrate_concurrency(mut self, n: usize) -> Self {
        self.hydrate_concurrency = n.max(1);
        self
    }

    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity.max(1);
        self
    }
}
