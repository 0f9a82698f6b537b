//! SQLite implementation of the Record Store.
//!
//! Saved records live in a single `bookmark` table keyed by record id. The
//! full record snapshot is stored as JSON so a saved listing stays readable
//! after it drops off the remote source.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use tracing::{debug, warn};

use jobdeck_core::{Error, Record, RecordId, RecordStore, Result};

const CREATE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS bookmark (
    id TEXT PRIMARY KEY NOT NULL,
    record TEXT NOT NULL,
    saved_at_ms INTEGER NOT NULL
)
"#;

/// SQLite-backed [`RecordStore`].
#[derive(Clone)]
pub struct SqliteRecordStore {
    pool: SqlitePool,
}

impl SqliteRecordStore {
    /// Create a new store over the given pool. Call [`Self::migrate`] once
    /// before first use.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create the bookmark table if it does not exist.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(CREATE_TABLE)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;
        debug!(subsystem = "db", component = "sqlite_store", op = "migrate", "Bookmark table ready");
        Ok(())
    }

    /// Number of saved records.
    pub async fn count(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM bookmark")
            .fetch_one(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(row.get("n"))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl RecordStore for SqliteRecordStore {
    async fn exists(&self, id: &RecordId) -> Result<bool> {
        let row = sqlx::query("SELECT 1 FROM bookmark WHERE id = ?")
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(row.is_some())
    }

    async fn put(&self, id: &RecordId, record: &Record) -> Result<()> {
        let body = serde_json::to_string(record)?;
        sqlx::query(
            "INSERT INTO bookmark (id, record, saved_at_ms) VALUES (?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET record = excluded.record, saved_at_ms = excluded.saved_at_ms",
        )
        .bind(id.as_str())
        .bind(body)
        .bind(Utc::now().timestamp_millis())
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        debug!(
            subsystem = "db",
            component = "sqlite_store",
            op = "put",
            record_id = %id,
            "Record saved"
        );
        Ok(())
    }

    async fn remove(&self, id: &RecordId) -> Result<()> {
        let result = sqlx::query("DELETE FROM bookmark WHERE id = ?")
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        debug!(
            subsystem = "db",
            component = "sqlite_store",
            op = "remove",
            record_id = %id,
            rows = result.rows_affected(),
            "Record removed"
        );
        Ok(())
    }

    async fn list_saved(&self) -> Result<Vec<Record>> {
        let rows = sqlx::query(
            "SELECT id, record FROM bookmark ORDER BY saved_at_ms DESC, rowid DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            let id: String = row.get("id");
            let body: String = row.get("record");
            match serde_json::from_str::<Record>(&body) {
                Ok(record) => records.push(record),
                Err(e) => warn!(
                    subsystem = "db",
                    component = "sqlite_store",
                    op = "list_saved",
                    record_id = %id,
                    error = %e,
                    "Skipping unreadable saved record"
                ),
            }
        }
        Ok(records)
    }
}
