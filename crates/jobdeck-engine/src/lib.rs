//! # jobdeck-engine
//!
//! Stateful side of jobdeck: the [`ListingController`] that pages records in
//! from a [`PageSource`] and derives the displayed subset, and the
//! [`BookmarkOverlay`] that mirrors saved flags from a [`RecordStore`].
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use jobdeck_engine::{ExperienceLevel, FilterSet, ListingController};
//!
//! let controller = ListingController::new(Arc::new(source), Arc::new(store));
//! controller.refresh().await;
//! controller
//!     .set_filters(FilterSet::new().with_experience(ExperienceLevel::Senior))
//!     .await;
//! for row in controller.snapshot().await.rows {
//!     println!("{} {}", if row.saved { "*" } else { " " }, row.record.id);
//! }
//! ```

pub mod config;
pub mod controller;
pub mod overlay;
pub mod view;

pub use jobdeck_core::*;

pub use config::{ListingConfig, RefreshPolicy};
pub use controller::{DropReason, ListingController, LoadOutcome};
pub use overlay::{BookmarkOverlay, HydrationReport};
pub use view::{ListingRow, ListingSnapshot, LoadError};
