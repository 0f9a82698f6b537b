//! Structured logging schema and field name constants for jobdeck.
//!
//! All crates use these names for structured `tracing` fields so that log
//! output can be filtered by the same keys across subsystems.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Unrecoverable setup failures (binary only) |
//! | WARN  | Fetch/storage failures, contract violations, duplicate ids |
//! | INFO  | Page loads, refreshes, bookmark changes |
//! | DEBUG | Dropped or stale loads, view recomputes, config choices |
//! | TRACE | Per-record iteration (hydration reads, filter misses) |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Listing session UUID (v7), one per controller.
pub const SESSION_ID: &str = "session_id";

/// Subsystem originating the log event.
/// Values: "engine", "search", "db", "source", "cli"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "listing", "bookmark_overlay", "http_source", "sqlite_store"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "load_next", "refresh", "hydrate", "toggle"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Record identifier being operated on.
pub const RECORD_ID: &str = "record_id";

/// Page number requested from the Page Source.
pub const PAGE: &str = "page";

/// Load generation a page request belongs to.
pub const GENERATION: &str = "generation";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of records in the displayed subset.
pub const RESULT_COUNT: &str = "result_count";

/// Number of records returned by one page.
pub const PAGE_SIZE: &str = "page_size";

/// Number of ids submitted to a hydration.
pub const ID_COUNT: &str = "id_count";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Boolean success/failure indicator.
pub const SUCCESS: &str = "success";

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";

/// Marks a Page Source contract violation distinctly from plain fetch errors.
pub const CONTRACT_VIOLATION: &str = "contract_violation";
