//! Storage layer.
//!
//! The prompt collection is persisted as a single record in a key-value
//! store. Backends are pluggable:
//!
//! | Backend | Location |
//! |---------|----------|
//! | Memory | Process memory, lost on exit |
//! | Filesystem | `{data_dir}/{key}.json` |
//! | `SQLite` | `{data_dir}/promptshelf.db`, table `kv` |
//!
//! [`PromptStorageAdapter`] sits on top and converts the record to and from
//! a list of prompts.

// Dropping the connection guard slightly earlier provides no meaningful benefit.
#![allow(clippy::significant_drop_tightening)]

mod adapter;
mod filesystem;
mod memory;
mod sqlite;
mod traits;

pub use adapter::{DEFAULT_RECORD_KEY, PromptStorageAdapter};
pub use filesystem::FilesystemKeyValueStore;
pub use memory::MemoryKeyValueStore;
pub use sqlite::SqliteKeyValueStore;
pub use traits::KeyValueStore;

use crate::config::{StorageBackendType, StorageConfig};
use crate::{Error, Result};
use std::path::PathBuf;
use std::sync::Arc;

/// Factory for creating key-value stores from configuration.
pub struct KeyValueStoreFactory;

impl KeyValueStoreFactory {
    /// Creates the store described by the storage configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be initialized.
    pub fn from_config(config: &StorageConfig) -> Result<Arc<dyn KeyValueStore>> {
        Self::create_with_backend(config.backend, config.path.clone())
    }

    /// Creates a store with an explicit backend type.
    ///
    /// # Arguments
    ///
    /// * `backend` - The backend type to use
    /// * `path` - Directory for the filesystem backend, database file for `SQLite`
    ///
    /// # Errors
    ///
    /// Returns an error if no path is given and no default can be determined,
    /// or if the backend cannot be initialized.
    pub fn create_with_backend(
        backend: StorageBackendType,
        path: Option<PathBuf>,
    ) -> Result<Arc<dyn KeyValueStore>> {
        match backend {
            StorageBackendType::Memory => Ok(Arc::new(MemoryKeyValueStore::new())),
            StorageBackendType::Filesystem => {
                let dir_path = path
                    .or_else(FilesystemKeyValueStore::default_path)
                    .ok_or_else(|| Error::OperationFailed {
                        operation: "create_filesystem_store".to_string(),
                        cause: "could not determine data directory".to_string(),
                    })?;
                Ok(Arc::new(FilesystemKeyValueStore::new(dir_path)?))
            },
            StorageBackendType::Sqlite => {
                let db_path = path
                    .or_else(SqliteKeyValueStore::default_path)
                    .ok_or_else(|| Error::OperationFailed {
                        operation: "create_sqlite_store".to_string(),
                        cause: "could not determine data directory".to_string(),
                    })?;
                Ok(Arc::new(SqliteKeyValueStore::new(db_path)?))
            },
        }
    }
}
