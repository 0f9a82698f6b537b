//! HTTP Page Source.
//!
//! Issues `GET <base_url>?<page_param>=<n>` and expects a JSON object whose
//! `data` member is the array of records on that page. Transport failures,
//! non-2xx statuses and undecodable bodies are fetch errors; a decodable body
//! with the wrong shape is a contract violation.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value as JsonValue;
use tracing::{debug, instrument, warn};

use jobdeck_core::{Error, PageSource, Record, Result};

use crate::config::SourceConfig;

/// Page Source backed by a JSON HTTP endpoint.
pub struct HttpPageSource {
    client: Client,
    config: SourceConfig,
}

impl HttpPageSource {
    pub fn new(config: SourceConfig) -> Result<Self> {
        config.validate()?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Config(format!("failed to create HTTP client: {}", e)))?;
        Ok(Self { client, config })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(SourceConfig::from_env())
    }

    pub fn config(&self) -> &SourceConfig {
        &self.config
    }
}

/// Decode a page body into records.
pub fn parse_page(body: JsonValue) -> Result<Vec<Record>> {
    let JsonValue::Object(mut map) = body else {
        return Err(Error::ContractViolation(
            "response body is not a JSON object".to_string(),
        ));
    };
    let items = match map.remove("data") {
        Some(JsonValue::Array(items)) => items,
        Some(other) => {
            return Err(Error::ContractViolation(format!(
                "`data` must be an array, got {}",
                json_type(&other)
            )))
        }
        None => {
            return Err(Error::ContractViolation(
                "response has no `data` member".to_string(),
            ))
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            serde_json::from_value::<Record>(item)
                .map_err(|e| Error::ContractViolation(format!("record {}: {}", i, e)))
        })
        .collect()
}

fn json_type(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

#[async_trait]
impl PageSource for HttpPageSource {
    #[instrument(skip(self), fields(subsystem = "source", component = "http_source"))]
    async fn fetch(&self, page: u32) -> Result<Vec<Record>> {
        if page == 0 {
            return Err(Error::InvalidInput("pages are 1-based".to_string()));
        }
        let start = Instant::now();

        let response = self
            .client
            .get(&self.config.base_url)
            .query(&[(self.config.page_param.as_str(), page)])
            .send()
            .await
            .map_err(|e| Error::Fetch(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            warn!(page, status = status.as_u16(), "Page request rejected");
            return Err(Error::Fetch(format!("HTTP {}", status)));
        }

        let body: JsonValue = response
            .json()
            .await
            .map_err(|e| Error::Fetch(format!("invalid response body: {}", e)))?;

        let records = parse_page(body)?;
        debug!(
            page,
            page_size = records.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Page fetched"
        );
        Ok(records)
    }

    fn name(&self) -> &str {
        "http"
    }
}
