//! Key-value store trait definition.

use crate::Result;
use serde_json::Value;

/// Trait for key-value store backends.
///
/// Each call is a single round trip that either completes or fails as a
/// whole. Writers are assumed to be single and last-write-wins.
pub trait KeyValueStore: Send + Sync {
    /// Gets the value stored under a key.
    ///
    /// # Arguments
    ///
    /// * `key` - The record key
    ///
    /// # Returns
    ///
    /// The stored value if present, None otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Persistence`] if the store cannot be read.
    fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Stores a value under a key, replacing any previous value.
    ///
    /// # Arguments
    ///
    /// * `key` - The record key
    /// * `value` - The value to store
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Persistence`] if the store cannot be written.
    fn set(&self, key: &str, value: &Value) -> Result<()>;

    /// Returns a short backend name for logging.
    fn backend_name(&self) -> &'static str;
}
