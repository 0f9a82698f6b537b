//! The Filter Evaluator.
//!
//! [`matches`] decides whether one record belongs to the displayed subset
//! for a given search text and filter set. Stages run in a fixed order and
//! short-circuit on the first failure:
//!
//! 1. free-text search (skipped when the normalized text is empty)
//! 2. experience slot
//! 3. employment-type slot
//! 4. compensation slot
//!
//! Absent fields never error; they simply fail any active stage that needs
//! them (compensation is the exception: absent parses as 0).

use tracing::trace;

use jobdeck_core::{FilterSet, Record};

use crate::compensation::compensation_matches;
use crate::keywords::{employment_type_matches, experience_matches};

/// A normalized search text: trimmed and lower-cased once, up front.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    needle: String,
}

impl SearchQuery {
    pub fn new(text: &str) -> Self {
        Self {
            needle: text.trim().to_lowercase(),
        }
    }

    /// True when the query places no constraint.
    pub fn is_empty(&self) -> bool {
        self.needle.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.needle
    }

    /// Search stage: the needle is a substring of at least one present field.
    pub fn matches(&self, record: &Record) -> bool {
        if self.is_empty() {
            return true;
        }
        search_fields(record)
            .into_iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(&self.needle))
    }
}

/// The fields free-text search looks at, in display order.
pub fn search_fields(record: &Record) -> [Option<&str>; 8] {
    [
        record.title.as_deref(),
        record.company.as_deref(),
        record.location.as_deref(),
        record.experience.as_deref(),
        record.job_type.as_deref(),
        record.qualification.as_deref(),
        record.category.as_deref(),
        record.role.as_deref(),
    ]
}

/// Evaluate a pre-normalized query and filter set against one record.
pub fn matches_query(record: &Record, query: &SearchQuery, filters: &FilterSet) -> bool {
    if !query.matches(record) {
        trace!(record_id = %record.id, stage = "search", "Record filtered out");
        return false;
    }

    if let Some(level) = filters.experience {
        if !experience_matches(record.experience.as_deref(), level) {
            trace!(record_id = %record.id, stage = "experience", "Record filtered out");
            return false;
        }
    }

    if let Some(kind) = filters.employment_type {
        if !employment_type_matches(record.job_type.as_deref(), kind) {
            trace!(record_id = %record.id, stage = "employment_type", "Record filtered out");
            return false;
        }
    }

    if let Some(range) = filters.compensation_range {
        if !compensation_matches(record.salary.as_deref(), range) {
            trace!(record_id = %record.id, stage = "compensation", "Record filtered out");
            return false;
        }
    }

    true
}

/// Evaluate raw search text and a filter set against one record.
pub fn matches(record: &Record, search_text: &str, filters: &FilterSet) -> bool {
    matches_query(record, &SearchQuery::new(search_text), filters)
}

/// Indices of the records that pass, in input order.
pub fn filter_records<'a, I>(records: I, search_text: &str, filters: &FilterSet) -> Vec<usize>
where
    I: IntoIterator<Item = &'a Record>,
{
    let query = SearchQuery::new(search_text);
    records
        .into_iter()
        .enumerate()
        .filter(|(_, r)| matches_query(r, &query, filters))
        .map(|(i, _)| i)
        .collect()
}
