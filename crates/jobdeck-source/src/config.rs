//! Page Source configuration.
//!
//! Loaded from environment variables:
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `JOBDECK_SOURCE_URL` | `http://127.0.0.1:8080/api/jobs` | Listings endpoint |
//! | `JOBDECK_PAGE_PARAM` | `page` | Query parameter carrying the page number |
//! | `JOBDECK_TIMEOUT_SECS` | `30` | Per-request timeout |

use serde::{Deserialize, Serialize};
use tracing::debug;

use jobdeck_core::defaults::{FETCH_TIMEOUT_SECS, PAGE_PARAM, SOURCE_URL};
use jobdeck_core::{Error, Result};

/// HTTP Page Source configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Listings endpoint; the page parameter is appended as a query string.
    pub base_url: String,
    /// Name of the page query parameter.
    pub page_param: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: SOURCE_URL.to_string(),
            page_param: PAGE_PARAM.to_string(),
            timeout_secs: FETCH_TIMEOUT_SECS,
        }
    }
}

impl SourceConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Build from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("JOBDECK_SOURCE_URL").unwrap_or_else(|_| SOURCE_URL.to_string());
        let page_param =
            std::env::var("JOBDECK_PAGE_PARAM").unwrap_or_else(|_| PAGE_PARAM.to_string());
        let timeout_secs = std::env::var("JOBDECK_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(FETCH_TIMEOUT_SECS);

        debug!(
            subsystem = "source",
            component = "config",
            base_url = %base_url,
            page_param = %page_param,
            timeout_secs,
            "Loaded source config"
        );

        Self {
            base_url,
            page_param,
            timeout_secs,
        }
    }

    pub fn with_page_param(mut self, param: impl Into<String>) -> Self {
        self.page_param = param.into();
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.base_url.is_empty() {
            return Err(Error::Config("source base_url cannot be empty".to_string()));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(Error::Config(format!(
                "source base_url must start with http:// or https://, got: {}",
                self.base_url
            )));
        }
        if self.page_param.trim().is_empty() {
            return Err(Error::Config("page_param cannot be empty".to_string()));
        }
        if self.timeout_secs == 0 {
            return Err(Error::Config("timeout_secs must be positive".to_string()));
        }
        Ok(())
    }
}
