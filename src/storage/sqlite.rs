//! SQLite-based key-value store.
//!
//! Stores records in a single `kv` table of `key -> JSON text`.

use super::KeyValueStore;
use crate::{Error, Result};
use rusqlite::{Connection, OptionalExtension, params};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// `SQLite`-based key-value store.
pub struct SqliteKeyValueStore {
    /// Connection to the `SQLite` database.
    conn: Mutex<Connection>,
    /// Path to the `SQLite` database.
    db_path: PathBuf,
}

impl SqliteKeyValueStore {
    /// Creates a new `SQLite` store.
    ///
    /// # Arguments
    ///
    /// * `db_path` - Path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new(db_path: impl Into<PathBuf>) -> Result<Self> {
        let db_path = db_path.into();

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| Error::Persistence {
                operation: "create_store_dir".to_string(),
                cause: e.to_string(),
            })?;
        }

        let conn = Connection::open(&db_path).map_err(|e| Error::Persistence {
            operation: "open_store_db".to_string(),
            cause: e.to_string(),
        })?;

        let store = Self {
            conn: Mutex::new(conn),
            db_path,
        };

        store.initialize()?;
        Ok(store)
    }

    /// Creates an in-memory `SQLite` store (useful for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|e| Error::Persistence {
            operation: "open_store_db_memory".to_string(),
            cause: e.to_string(),
        })?;

        let store = Self {
            conn: Mutex::new(conn),
            db_path: PathBuf::from(":memory:"),
        };

        store.initialize()?;
        Ok(store)
    }

    /// Returns the default database path.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "promptshelf")
            .map(|d| d.data_dir().join("promptshelf.db"))
    }

    /// Returns the database path.
    #[must_use]
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    fn initialize(&self) -> Result<()> {
        let conn = self.lock_conn()?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
            [],
        )
        .map_err(|e| Error::Persistence {
            operation: "create_kv_table".to_string(),
            cause: e.to_string(),
        })?;

        Ok(())
    }

    /// Locks the connection and returns a guard.
    fn lock_conn(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|e| Error::Persistence {
            operation: "lock_store_db".to_string(),
            cause: e.to_string(),
        })
    }
}

impl KeyValueStore for SqliteKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        let conn = self.lock_conn()?;

        let raw: Option<String> = conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()
            .map_err(|e| Error::Persistence {
                operation: "get_record".to_string(),
                cause: e.to_string(),
            })?;

        raw.map(|text| {
            serde_json::from_str(&text).map_err(|e| Error::Persistence {
                operation: "parse_record_json".to_string(),
                cause: e.to_string(),
            })
        })
        .transpose()
    }

    fn set(&self, key: &str, value: &Value) -> Result<()> {
        let text = serde_json::to_string(value).map_err(|e| Error::Persistence {
            operation: "serialize_record".to_string(),
            cause: e.to_string(),
        })?;

        let conn = self.lock_conn()?;
        conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, text],
        )
        .map_err(|e| Error::Persistence {
            operation: "set_record".to_string(),
            cause: e.to_string(),
        })?;

        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "sqlite"
    }
}
