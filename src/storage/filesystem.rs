//! Filesystem-based key-value store.
//!
//! Stores each key as a JSON file in a directory.

use super::KeyValueStore;
use crate::{Error, Result};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Key bytes that are escaped in file names: everything except ASCII
/// letters, digits, `_` and `-`.
const KEY_ESCAPES: &AsciiSet = &NON_ALPHANUMERIC.remove(b'_').remove(b'-');

/// Filesystem-based key-value store.
///
/// Stores each record as a JSON file: `{base_path}/{key}.json`
pub struct FilesystemKeyValueStore {
    /// Base directory for record files.
    base_path: PathBuf,
}

impl FilesystemKeyValueStore {
    /// Creates a new filesystem store.
    ///
    /// # Arguments
    ///
    /// * `base_path` - Directory to store record files
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn new(base_path: impl Into<PathBuf>) -> Result<Self> {
        let path = base_path.into();

        fs::create_dir_all(&path).map_err(|e| Error::Persistence {
            operation: "create_store_dir".to_string(),
            cause: e.to_string(),
        })?;

        Ok(Self { base_path: path })
    }

    /// Returns the default store directory.
    ///
    /// Returns the platform data dir joined with `promptshelf`.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "promptshelf").map(|d| d.data_dir().to_path_buf())
    }

    /// Returns the base path.
    #[must_use]
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Gets the file path for a key.
    ///
    /// The key is percent-encoded, so distinct keys get distinct files and
    /// no key can name a path outside the base directory.
    fn record_path(&self, key: &str) -> PathBuf {
        let safe = utf8_percent_encode(key, KEY_ESCAPES);
        self.base_path.join(format!("{safe}.json"))
    }
}

impl KeyValueStore for FilesystemKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        let path = self.record_path(key);

        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path).map_err(|e| Error::Persistence {
            operation: "read_record_file".to_string(),
            cause: format!("{}: {e}", path.display()),
        })?;

        let value = serde_json::from_str(&content).map_err(|e| Error::Persistence {
            operation: "parse_record_json".to_string(),
            cause: format!("{}: {e}", path.display()),
        })?;

        Ok(Some(value))
    }

    fn set(&self, key: &str, value: &Value) -> Result<()> {
        let path = self.record_path(key);
        let content = serde_json::to_string_pretty(value).map_err(|e| Error::Persistence {
            operation: "serialize_record".to_string(),
            cause: e.to_string(),
        })?;

        // Write then rename so a failed write leaves the previous record intact.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, content).map_err(|e| Error::Persistence {
            operation: "write_record_file".to_string(),
            cause: format!("{}: {e}", tmp.display()),
        })?;
        fs::rename(&tmp, &path).map_err(|e| Error::Persistence {
            operation: "rename_record_file".to_string(),
            cause: format!("{}: {e}", path.display()),
        })
    }

    fn backend_name(&self) -> &'static str {
        "filesystem"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_filesystem_store_creation() {
        let dir = TempDir::new().unwrap();
        let store = FilesystemKeyValueStore::new(dir.path()).unwrap();
        assert_eq!(store.base_path(), dir.path());
    }

    #[test]
    fn test_set_and_get_record() {
        let dir = TempDir::new().unwrap();
        let store = FilesystemKeyValueStore::new(dir.path()).unwrap();

        assert!(store.get("prompts").unwrap().is_none());

        store.set("prompts", &json!([{"id": "1"}])).unwrap();
        assert_eq!(store.get("prompts").unwrap(), Some(json!([{"id": "1"}])));
        assert!(dir.path().join("prompts.json").exists());
        assert!(!dir.path().join("prompts.json.tmp").exists());
    }

    #[test]
    fn test_record_survives_reopen() {
        let dir = TempDir::new().unwrap();
        FilesystemKeyValueStore::new(dir.path())
            .unwrap()
            .set("prompts", &json!(["a"]))
            .unwrap();

        let reopened = FilesystemKeyValueStore::new(dir.path()).unwrap();
        assert_eq!(reopened.get("prompts").unwrap(), Some(json!(["a"])));
    }

    #[test]
    fn test_corrupt_record_is_persistence_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("prompts.json"), "{not json").unwrap();
        let store = FilesystemKeyValueStore::new(dir.path()).unwrap();

        assert!(matches!(
            store.get("prompts"),
            Err(Error::Persistence { .. })
        ));
    }

    #[test]
    fn test_key_cannot_escape_base_dir() {
        let dir = TempDir::new().unwrap();
        let store = FilesystemKeyValueStore::new(dir.path()).unwrap();
        store.set("../escape", &json!(1)).unwrap();
        assert!(dir.path().join("%2E%2E%2Fescape.json").exists());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_similar_keys_do_not_collide() {
        let dir = TempDir::new().unwrap();
        let store = FilesystemKeyValueStore::new(dir.path()).unwrap();
        store.set("a.b", &json!("dot")).unwrap();
        store.set("a_b", &json!("underscore")).unwrap();
        store.set("a/b", &json!("slash")).unwrap();

        assert_eq!(store.get("a.b").unwrap(), Some(json!("dot")));
        assert_eq!(store.get("a_b").unwrap(), Some(json!("underscore")));
        assert_eq!(store.get("a/b").unwrap(), Some(json!("slash")));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 3);
    }

    #[test]
    fn test_plain_keys_keep_their_file_name() {
        let dir = TempDir::new().unwrap();
        let store = FilesystemKeyValueStore::new(dir.path()).unwrap();
        store.set("prompts", &json!([])).unwrap();
        store.set("work-v2_x", &json!([])).unwrap();
        assert!(dir.path().join("prompts.json").exists());
        assert!(dir.path().join("work-v2_x.json").exists());
    }

    #[test]
    fn test_default_path() {
        if let Some(p) = FilesystemKeyValueStore::default_path() {
            assert!(p.to_string_lossy().contains("promptshelf"));
        }
    }
}
