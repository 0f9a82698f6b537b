//! Centralized default constants for jobdeck.
//!
//! All crates reference these constants instead of defining their own magic
//! numbers. Organized by domain area.

// =============================================================================
// PAGINATION
// =============================================================================

/// First page number requested from a Page Source. Pages are 1-based.
pub const FIRST_PAGE: u32 = 1;

/// Default number of pages the CLI loads before rendering.
pub const CLI_PAGES: u32 = 1;

// =============================================================================
// PAGE SOURCE
// =============================================================================

/// Default base URL of the listings endpoint.
pub const SOURCE_URL: &str = "http://127.0.0.1:8080/api/jobs";

/// Default query parameter carrying the page number.
pub const PAGE_PARAM: &str = "page";

/// Timeout for a single page request in seconds.
pub const FETCH_TIMEOUT_SECS: u64 = 30;

// =============================================================================
// RECORD STORE
// =============================================================================

/// Default SQLite database URL for bookmarks.
pub const DATABASE_URL: &str = "sqlite://jobdeck.db?mode=rwc";

/// Maximum pooled connections for the bookmark database.
pub const DB_MAX_CONNECTIONS: u32 = 4;

/// Connection acquire timeout in seconds.
pub const DB_CONNECT_TIMEOUT_SECS: u64 = 30;

// =============================================================================
// BOOKMARK OVERLAY
// =============================================================================

/// Maximum concurrent Record Store queries issued by a single hydration.
pub const HYDRATE_CONCURRENCY: usize = 8;

// =============================================================================
// EVENTS
// =============================================================================

/// Default event bus broadcast channel capacity.
pub const EVENT_BUS_CAPACITY: usize = 256;

// =============================================================================
// COMPENSATION BUCKETS
// =============================================================================

/// Upper bound of the lowest compensation bucket (inclusive).
pub const COMPENSATION_LOW_MAX: u64 = 20_000;

/// Upper bound of the middle compensation bucket (inclusive).
pub const COMPENSATION_MID_MAX: u64 = 50_000;

/// Upper bound of the upper-middle bucket and floor of the open-ended top bucket.
pub const COMPENSATION_HIGH_MIN: u64 = 100_000;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buckets_are_ordered() {
        assert!(COMPENSATION_LOW_MAX < COMPENSATION_MID_MAX);
        assert!(COMPENSATION_MID_MAX < COMPENSATION_HIGH_MIN);
    }

    #[test]
    fn test_first_page_is_one() {
        assert_eq!(FIRST_PAGE, 1);
    }
}
