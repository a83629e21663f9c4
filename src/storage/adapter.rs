//! Storage adapter for the prompt collection.
//!
//! The whole collection is one record: an ordered JSON array of prompts
//! under a single key.

use super::KeyValueStore;
use crate::models::Prompt;
use crate::{Error, Result};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Default key of the prompt collection record.
pub const DEFAULT_RECORD_KEY: &str = "prompts";

/// Loads and saves the prompt collection through a [`KeyValueStore`].
#[derive(Clone)]
pub struct PromptStorageAdapter {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl PromptStorageAdapter {
    /// Creates an adapter over the default record key.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_key(store, DEFAULT_RECORD_KEY)
    }

    /// Creates an adapter over a custom record key.
    #[must_use]
    pub fn with_key(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Returns the record key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the name of the underlying backend.
    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }

    /// Loads the collection.
    ///
    /// A missing record (or a JSON `null`) is an empty collection.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Persistence`] if the store fails or the record is not
    /// a list of prompts.
    #[instrument(skip(self), fields(key = %self.key, backend = self.backend_name()))]
    pub fn load(&self) -> Result<Vec<Prompt>> {
        let Some(value) = self.store.get(&self.key)? else {
            debug!("no stored prompt record");
            return Ok(Vec::new());
        };
        if value.is_null() {
            return Ok(Vec::new());
        }

        let prompts: Vec<Prompt> =
            serde_json::from_value(value).map_err(|e| Error::Persistence {
                operation: "decode_prompts".to_string(),
                cause: e.to_string(),
            })?;
        debug!(count = prompts.len(), "loaded prompts");
        Ok(prompts)
    }

    /// Saves the whole collection, replacing the stored record.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Persistence`] if the store fails.
    #[instrument(skip(self, prompts), fields(key = %self.key, count = prompts.len()))]
    pub fn save(&self, prompts: &[Prompt]) -> Result<()> {
        let value = serde_json::to_value(prompts).map_err(|e| Error::Persistence {
            operation: "encode_prompts".to_string(),
            cause: e.to_string(),
        })?;
        self.store.set(&self.key, &value)?;
        debug!("saved prompts");
        Ok(())
    }
}

impl std::fmt::Debug for PromptStorageAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PromptStorageAdapter")
            .field("backend", &self.backend_name())
            .field("key", &self.key)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryKeyValueStore;
    use serde_json::json;

    #[test]
    fn test_load_missing_record_is_empty() {
        let adapter = PromptStorageAdapter::new(Arc::new(MemoryKeyValueStore::new()));
        assert!(adapter.load().unwrap().is_empty());
    }

    #[test]
    fn test_load_null_record_is_empty() {
        let store = MemoryKeyValueStore::with_record(DEFAULT_RECORD_KEY, json!(null));
        let adapter = PromptStorageAdapter::new(Arc::new(store));
        assert!(adapter.load().unwrap().is_empty());
    }

    #[test]
    fn test_save_then_load_preserves_order() {
        let adapter = PromptStorageAdapter::new(Arc::new(MemoryKeyValueStore::new()));
        let prompts = vec![
            Prompt::new("2", "B", "b"),
            Prompt::new("1", "A", "a").with_tags(vec!["x".to_string()]),
        ];
        adapter.save(&prompts).unwrap();
        assert_eq!(adapter.load().unwrap(), prompts);
    }

    #[test]
    fn test_malformed_record_is_persistence_error() {
        let store = MemoryKeyValueStore::with_record(DEFAULT_RECORD_KEY, json!({"not": "a list"}));
        let adapter = PromptStorageAdapter::new(Arc::new(store));
        assert!(matches!(adapter.load(), Err(Error::Persistence { .. })));
    }

    #[test]
    fn test_custom_key() {
        let store = Arc::new(MemoryKeyValueStore::new());
        let adapter = PromptStorageAdapter::with_key(store.clone(), "work");
        adapter.save(&[Prompt::new("1", "A", "a")]).unwrap();
        assert!(store.get("work").unwrap().is_some());
        assert!(store.get(DEFAULT_RECORD_KEY).unwrap().is_none());
    }
}
