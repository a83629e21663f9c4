//! In-memory key-value store.
//!
//! Nothing survives the process. Used for tests and `--backend memory`.

use super::KeyValueStore;
use crate::{Error, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;

/// In-memory key-value store.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: Mutex<HashMap<String, Value>>,
}

impl MemoryKeyValueStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-seeded with one record.
    #[must_use]
    pub fn with_record(key: impl Into<String>, value: Value) -> Self {
        let mut entries = HashMap::new();
        entries.insert(key.into(), value);
        Self {
            entries: Mutex::new(entries),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, Value>>> {
        self.entries.lock().map_err(|e| Error::Persistence {
            operation: "lock_memory_store".to_string(),
            cause: e.to_string(),
        })
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &Value) -> Result<()> {
        self.lock()?.insert(key.to_string(), value.clone());
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_missing_key() {
        let store = MemoryKeyValueStore::new();
        assert!(store.get("prompts").unwrap().is_none());
    }

    #[test]
    fn test_set_then_get() {
        let store = MemoryKeyValueStore::new();
        store.set("prompts", &json!([1, 2])).unwrap();
        assert_eq!(store.get("prompts").unwrap(), Some(json!([1, 2])));

        store.set("prompts", &json!([])).unwrap();
        assert_eq!(store.get("prompts").unwrap(), Some(json!([])));
    }

    #[test]
    fn test_with_record() {
        let store = MemoryKeyValueStore::with_record("k", json!("v"));
        assert_eq!(store.get("k").unwrap(), Some(json!("v")));
    }
}
