//! Key-value persistence for the city selection.
//!
//! This module defines the `KeyValueStore` trait the dashboard persists
//! through, and `SqliteKvStore`, its local SQLite implementation. The
//! dashboard stores one value under one fixed key; the schema is a plain
//! two-column table.

use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying SQLite failure.
    #[error("Storage error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Trait for key-value storage backends.
///
/// Note: Implementations don't need to be Sync - the dashboard owns its
/// store and serializes access through `&mut self` operations.
pub trait KeyValueStore: Send {
    /// Get the value stored under `key`, or `None` if absent.
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Store `value` under `key`, replacing any existing value.
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;
}

/// SQLite-backed key-value store.
pub struct SqliteKvStore {
    conn: Connection,
}

impl SqliteKvStore {
    /// Open or create the store at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    /// Create an in-memory store (for testing).
    #[cfg(test)]
    pub fn in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> StoreResult<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;
        Ok(())
    }
}

impl KeyValueStore for SqliteKvStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_absent_key_is_none() {
        let store = SqliteKvStore::in_memory().unwrap();
        assert_eq!(store.get("selectedCities").unwrap(), None);
    }

    #[test]
    fn test_set_then_get() {
        let store = SqliteKvStore::in_memory().unwrap();
        store.set("selectedCities", r#"["Lisbon, PT"]"#).unwrap();
        assert_eq!(
            store.get("selectedCities").unwrap().as_deref(),
            Some(r#"["Lisbon, PT"]"#)
        );
    }

    #[test]
    fn test_set_overwrites() {
        let store = SqliteKvStore::in_memory().unwrap();
        store.set("k", "first").unwrap();
        store.set("k", "second").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("second"));
    }

    #[test]
    fn test_open_persists_across_connections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kv.db");

        {
            let store = SqliteKvStore::open(&path).unwrap();
            store.set("k", "v").unwrap();
        }

        let reopened = SqliteKvStore::open(&path).unwrap();
        assert_eq!(reopened.get("k").unwrap().as_deref(), Some("v"));
    }
}
