//! # jobdeck-core
//!
//! Core types, traits, and abstractions for the jobdeck listing engine.
//!
//! This crate provides the foundational data structures and trait definitions
//! that other jobdeck crates depend on: the [`Record`] model, the categorical
//! [`FilterSet`], the error taxonomy, and the two external collaborators
//! ([`PageSource`] and [`RecordStore`]).

pub mod defaults;
pub mod error;
pub mod events;
pub mod filter;
pub mod logging;
pub mod models;
pub mod traits;

// Re-export commonly used types at crate root
pub use error::{Error, ErrorKind, Result};
pub use events::{EventBus, EventEnvelope, ListingEvent};
pub use filter::{CompensationRange, EmploymentType, ExperienceLevel, FilterChoice, FilterSet};
pub use models::*;
pub use traits::*;
