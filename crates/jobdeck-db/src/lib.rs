//! # jobdeck-db
//!
//! Record Store implementations for jobdeck.
//!
//! This crate provides:
//! - SQLite connection pool management
//! - [`SqliteRecordStore`], the persistent bookmark store
//! - [`MemoryRecordStore`], an in-memory store with failure injection
//!
//! ## Example
//!
//! ```rust,ignore
//! use jobdeck_db::{Database, RecordStore};
//!
//! #[tokio::main]
//! async fn main() -> jobdeck_db::Result<()> {
//!     let db = Database::connect("sqlite://jobdeck.db?mode=rwc").await?;
//!     let saved = db.bookmarks.list_saved().await?;
//!     println!("{} saved listings", saved.len());
//!     Ok(())
//! }
//! ```

pub mod bookmarks;
pub mod memory;
pub mod pool;

// Re-export core types
pub use jobdeck_core::*;

pub use bookmarks::SqliteRecordStore;
pub use memory::MemoryRecordStore;
pub use pool::{create_pool, create_pool_with_config, database_url_from_env, PoolConfig};

use sqlx::SqlitePool;

/// Connected bookmark database with its schema in place.
#[derive(Clone)]
pub struct Database {
    pub pool: SqlitePool,
    pub bookmarks: SqliteRecordStore,
}

impl Database {
    /// Connect with default pool settings and create the schema.
    pub async fn connect(database_url: &str) -> Result<Self> {
        Self::connect_with_config(database_url, PoolConfig::default()).await
    }

    pub async fn connect_with_config(database_url: &str, config: PoolConfig) -> Result<Self> {
        let pool = create_pool_with_config(database_url, config).await?;
        let bookmarks = SqliteRecordStore::new(pool.clone());
        bookmarks.migrate().await?;
        Ok(Self { pool, bookmarks })
    }
}
