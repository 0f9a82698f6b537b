//! # jobdeck-source
//!
//! Page Source implementations for jobdeck.
//!
//! - [`HttpPageSource`]: fetches pages from a JSON endpoint over HTTP
//! - `MockPageSource` (feature `mock`): scripted pages for tests

pub mod config;
pub mod http;
#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use config::SourceConfig;
pub use http::{parse_page, HttpPageSource};
pub use jobdeck_core::{Error, PageSource, Record, Result};

#[cfg(any(test, feature = "mock"))]
pub use mock::{numbered_records, MockPage, MockPageSource, PageGate};
