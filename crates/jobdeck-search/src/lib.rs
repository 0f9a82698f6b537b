//! # jobdeck-search
//!
//! Filter Evaluator for jobdeck listings.
//!
//! This crate provides:
//! - Case-insensitive free-text search across the searchable record fields
//! - Keyword-containment matching for experience and employment-type slots
//! - Compensation descriptor parsing and bucket tests
//!
//! Every function here is pure; nothing touches I/O or shared state.
//!
//! ## Example
//!
//! ```
//! use jobdeck_search::{matches, FilterSet, ExperienceLevel, Record};
//!
//! let record = Record::new("1")
//!     .with_title("Senior Rust Engineer")
//!     .with_experience("5+ years");
//! let filters = FilterSet::new().with_experience(ExperienceLevel::Senior);
//!
//! assert!(matches(&record, "rust", &filters));
//! assert!(!matches(&record, "sales", &filters));
//! ```

pub mod compensation;
pub mod evaluator;
pub mod keywords;

// Re-export core types
pub use jobdeck_core::*;

pub use compensation::parse_compensation;
pub use evaluator::{filter_records, matches, search_fields, SearchQuery};
pub use keywords::{employment_type_matches, experience_matches};
