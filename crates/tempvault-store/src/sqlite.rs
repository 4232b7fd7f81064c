//! SQLite implementation of the Store trait.
//!
//! This is the primary storage backend for Temp Vault. It uses rusqlite with
//! bundled SQLite, wrapped in async via tokio::spawn_blocking.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension};
use tempvault_core::{AccessKey, EditKey, Record, RetentionPeriod};

use crate::error::{Result, StoreError};
use crate::migration;
use crate::traits::{InsertResult, Store};

const SELECT_COLUMNS: &str =
    "access_key, edit_key, text, created_at, retention, expires_at, revision";

/// SQLite-based store implementation.
///
/// Thread-safe via internal Mutex. All operations use spawn_blocking
/// to avoid blocking the async runtime. The connection slot is emptied by
/// [`Store::close`].
pub struct SqliteStore {
    conn: Arc<Mutex<Option<Connection>>>,
}

impl SqliteStore {
    /// Open a SQLite database at the given path.
    ///
    /// Creates the file and runs migrations if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut conn = Connection::open(path)?;
        migration::migrate(&mut conn)?;
        tracing::debug!(path = %path.display(), "opened sqlite vault store");
        Ok(Self::from_connection(conn))
    }

    /// Open an in-memory SQLite database.
    ///
    /// Useful for testing.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migration::migrate(&mut conn)?;
        Ok(Self::from_connection(conn))
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(Some(conn))),
        }
    }

    /// Run a blocking closure against the connection on the blocking pool.
    async fn run<F, T>(&self, op: &'static str, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);

        tokio::task::spawn_blocking(move || {
            let mut slot = conn
                .lock()
                .map_err(|e| StoreError::Unavailable(format!("mutex poisoned: {}", e)))?;
            let conn = slot
                .as_mut()
                .ok_or_else(|| StoreError::Unavailable("store is closed".into()))?;
            f(conn)
        })
        .await
        .map_err(|e| StoreError::Unavailable(format!("{} failed to run: {}", op, e)))?
    }
}

// Helper to convert a row to Record
fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<Record> {
    let access_key: String = row.get("access_key")?;
    let retention: String = row.get("retention")?;

    let access_key = AccessKey::new(access_key)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e)))?;
    let retention: RetentionPeriod = retention
        .parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e)))?;

    Ok(Record::restore(
        access_key,
        EditKey::from_stored(row.get("edit_key")?),
        row.get("text")?,
        row.get("created_at")?,
        retention,
        row.get("expires_at")?,
        row.get("revision")?,
    ))
}

#[async_trait]
impl Store for SqliteStore {
    async fn insert(&self, record: &Record, now: i64) -> Result<InsertResult> {
        let record = record.clone();

        self.run("insert", move |conn| {
            // The conflict branch only fires when the occupant is already due.
            let changed = conn.execute(
                "INSERT INTO vaults (
                    access_key, edit_key, text, created_at, retention, expires_at, revision
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                ON CONFLICT(access_key) DO UPDATE SET
                    edit_key = excluded.edit_key,
                    text = excluded.text,
                    created_at = excluded.created_at,
                    retention = excluded.retention,
                    expires_at = excluded.expires_at,
                    revision = excluded.revision
                WHERE vaults.expires_at <= ?8",
                params![
                    record.access_key().as_str(),
                    record.edit_key().expose(),
                    record.text(),
                    record.created_at(),
                    record.retention().as_label(),
                    record.expires_at(),
                    record.revision(),
                    now,
                ],
            )?;

            if changed == 0 {
                Ok(InsertResult::AlreadyExists)
            } else {
                Ok(InsertResult::Inserted)
            }
        })
        .await
    }

    async fn get(&self, key: &AccessKey) -> Result<Option<Record>> {
        let key = key.clone();

        self.run("get", move |conn| {
            let record = conn
                .query_row(
                    &format!("SELECT {} FROM vaults WHERE access_key = ?1", SELECT_COLUMNS),
                    params![key.as_str()],
                    row_to_record,
                )
                .optional()?;
            Ok(record)
        })
        .await
    }

    async fn put(&self, record: &Record) -> Result<()> {
        let record = record.clone();

        self.run("put", move |conn| {
            conn.execute(
                "INSERT INTO vaults (
                    access_key, edit_key, text, created_at, retention, expires_at, revision
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                ON CONFLICT(access_key) DO UPDATE SET
                    edit_key = excluded.edit_key,
                    text = excluded.text,
                    created_at = excluded.created_at,
                    retention = excluded.retention,
                    expires_at = excluded.expires_at,
                    revision = excluded.revision",
                params![
                    record.access_key().as_str(),
                    record.edit_key().expose(),
                    record.text(),
                    record.created_at(),
                    record.retention().as_label(),
                    record.expires_at(),
                    record.revision(),
                ],
            )?;
            Ok(())
        })
        .await
    }

    async fn put_if_current(&self, record: &Record, now: i64) -> Result<bool> {
        let record = record.clone();

        self.run("put_if_current", move |conn| {
            // Only text and revision change within one creation.
            let changed = conn.execute(
                "UPDATE vaults SET text = ?2, revision = ?3
                WHERE access_key = ?1 AND created_at = ?4 AND expires_at > ?5",
                params![
                    record.access_key().as_str(),
                    record.text(),
                    record.revision(),
                    record.created_at(),
                    now,
                ],
            )?;
            Ok(changed == 1)
        })
        .await
    }

    async fn compare_and_put(
        &self,
        record: &Record,
        expected_revision: u64,
        now: i64,
    ) -> Result<bool> {
        let record = record.clone();

        self.run("compare_and_put", move |conn| {
            let changed = conn.execute(
                "UPDATE vaults SET text = ?2, revision = ?3
                WHERE access_key = ?1 AND created_at = ?4 AND expires_at > ?5
                    AND revision = ?6",
                params![
                    record.access_key().as_str(),
                    record.text(),
                    record.revision(),
                    record.created_at(),
                    now,
                    expected_revision,
                ],
            )?;
            Ok(changed == 1)
        })
        .await
    }

    async fn delete(&self, key: &AccessKey) -> Result<bool> {
        let key = key.clone();

        self.run("delete", move |conn| {
            let changed = conn.execute(
                "DELETE FROM vaults WHERE access_key = ?1",
                params![key.as_str()],
            )?;
            Ok(changed > 0)
        })
        .await
    }

    async fn delete_if_current(&self, key: &AccessKey, created_at: i64) -> Result<bool> {
        let key = key.clone();

        self.run("delete_if_current", move |conn| {
            let changed = conn.execute(
                "DELETE FROM vaults WHERE access_key = ?1 AND created_at = ?2",
                params![key.as_str(), created_at],
            )?;
            Ok(changed > 0)
        })
        .await
    }

    async fn delete_if_expired(&self, key: &AccessKey, now: i64) -> Result<bool> {
        let key = key.clone();

        self.run("delete_if_expired", move |conn| {
            let changed = conn.execute(
                "DELETE FROM vaults WHERE access_key = ?1 AND expires_at <= ?2",
                params![key.as_str(), now],
            )?;
            Ok(changed > 0)
        })
        .await
    }

    async fn expired_as_of(&self, now: i64) -> Result<Vec<Record>> {
        self.run("expired_as_of", move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {} FROM vaults WHERE expires_at <= ?1 ORDER BY expires_at",
                SELECT_COLUMNS
            ))?;
            let records = stmt
                .query_map(params![now], row_to_record)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(records)
        })
        .await
    }

    async fn count(&self) -> Result<usize> {
        self.run("count", |conn| {
            let count: i64 = conn.query_row("SELECT COUNT(*) FROM vaults", [], |row| row.get(0))?;
            usize::try_from(count).map_err(|_| StoreError::InvalidData(format!("row count {}", count)))
        })
        .await
    }

    async fn close(&self) -> Result<()> {
        let conn = Arc::clone(&self.conn);

        tokio::task::spawn_blocking(move || {
            let mut slot = conn
                .lock()
                .map_err(|e| StoreError::Unavailable(format!("mutex poisoned: {}", e)))?;
            if let Some(conn) = slot.take() {
                conn.close().map_err(|(_, e)| StoreError::Database(e))?;
                tracing::debug!("closed sqlite vault store");
            }
            Ok(())
        })
        .await
        .map_err(|e| StoreError::Unavailable(format!("close failed to run: {}", e)))?
    }
}
