//! Key-value persistence backends.
//!
//! The note store only ever talks to a [`KeyValueStore`]. Two backends are
//! provided: [`SqliteStore`], a single-table SQLite file used by the CLI, and
//! [`MemoryStore`], used by tests and throwaway sessions.

use crate::{QuicknotesError, Result};
use rusqlite::{Connection, OptionalExtension};
use std::collections::HashMap;
use std::path::Path;

/// Value written to `store_meta.format` by [`SqliteStore::create`].
const STORE_FORMAT: &str = "quicknotes-kv-1";

/// A string-to-string persistence backend.
pub trait KeyValueStore {
    /// Returns the value stored under `key`, or `None` if the key is absent.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`. Removing an absent key is not an error.
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// In-memory backend; contents are lost when it is dropped.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if a value is stored under `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// SQLite-backed key-value store.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Creates (or re-initialises) a store at `path`.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch(include_str!("schema.sql"))?;
        Ok(Self { conn })
    }

    /// Opens an existing store, rejecting files that are not Quicknotes stores.
    ///
    /// # Errors
    ///
    /// Returns [`QuicknotesError::InvalidStore`] if the expected tables or the
    /// format marker are missing, or [`QuicknotesError::Database`] if the file
    /// is not a SQLite database at all.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;

        let table_count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master
             WHERE type='table'
             AND name IN ('kv', 'store_meta')",
            [],
            |row| row.get(0),
        )?;
        if table_count != 2 {
            return Err(QuicknotesError::InvalidStore(
                "Not a valid Quicknotes store".to_string(),
            ));
        }

        let format: Option<String> = conn
            .query_row(
                "SELECT value FROM store_meta WHERE key = 'format'",
                [],
                |row| row.get(0),
            )
            .optional()?;
        if format.as_deref() != Some(STORE_FORMAT) {
            return Err(QuicknotesError::InvalidStore(format!(
                "Unsupported store format: {}",
                format.unwrap_or_else(|| "missing".to_string())
            )));
        }

        Ok(Self { conn })
    }

    /// Opens the store at `path`, creating it first if the file does not exist.
    pub fn open_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::open(path)
        } else {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            log::debug!("creating new store at {}", path.display());
            Self::create(path)
        }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?", [key], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            rusqlite::params![key, value],
        )?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.conn.execute("DELETE FROM kv WHERE key = ?", [key])?;
        Ok(())
    }
}
