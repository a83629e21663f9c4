//! # Promptshelf
//!
//! A shelf of short, tagged text snippets ("prompts") that can be searched,
//! browsed and copied.
//!
//! The collection lives under a single key in a key-value store and is
//! loaded into an owned [`PromptStore`] when a session opens. Searching is a
//! stable substring filter; a leading `@` switches to tag-only matching and
//! drives tag autocomplete.
//!
//! ## Features
//!
//! - Pluggable key-value backends (memory, filesystem, `SQLite`)
//! - Plain and tag-prefix (`@tag`) search
//! - Tag autocomplete with a wrap-around selection cursor
//! - UI-independent session driven by explicit [`Intent`]s
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use promptshelf::storage::{MemoryKeyValueStore, PromptStorageAdapter};
//! use promptshelf::{PromptStore, search};
//!
//! let adapter = PromptStorageAdapter::new(Arc::new(MemoryKeyValueStore::new()));
//! let mut store = PromptStore::new(adapter);
//! store.create("Greeting", "Hello there", vec!["casual".to_string()])?;
//!
//! let hits = search(store.prompts(), "@cas");
//! assert_eq!(hits.len(), 1);
//! # Ok::<(), promptshelf::Error>(())
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![allow(clippy::multiple_crate_versions)]

use thiserror::Error as ThisError;

// Module declarations
pub mod cli;
pub mod config;
pub mod models;
pub mod observability;
pub mod services;
pub mod storage;

// Re-exports for convenience
pub use config::{PromptshelfConfig, StorageBackendType};
pub use models::{Prompt, PromptForm, PromptId, fold, parse_tags};
pub use services::{
    Autocomplete, CursorState, Direction, Intent, LoadReport, Notice, NoticeLevel, Outcome,
    PromptStore, Session, SessionView, TAG_SIGIL, available_tags, search, suggest,
};
pub use storage::{KeyValueStore, PromptStorageAdapter};

/// Error type for promptshelf operations.
///
/// # Error Variant Triggers
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `Validation` | Empty title or content at save time |
/// | `NotFound` | Update, delete or lookup of an id that is not in the collection |
/// | `Persistence` | A key-value store round trip fails |
/// | `OperationFailed` | Configuration or logging setup fails |
#[derive(Debug, ThisError)]
pub enum Error {
    /// The prompt fields failed validation.
    ///
    /// Raised before any mutation takes place, so the collection is unchanged.
    #[error("validation failed: {0}")]
    Validation(String),

    /// No prompt with the given id exists.
    #[error("prompt not found: {0}")]
    NotFound(String),

    /// The storage round trip failed.
    ///
    /// The in-memory collection may already reflect the attempted change.
    #[error("persistence '{operation}' failed: {cause}")]
    Persistence {
        /// The storage operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },

    /// A non-storage operation failed.
    #[error("operation '{operation}' failed: {cause}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },
}

impl Error {
    /// Whether retrying the same call could succeed.
    ///
    /// Only storage failures are retryable; validation and lookup errors need
    /// different input.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Persistence { .. })
    }
}

/// Result type alias for promptshelf operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Returns the current Unix timestamp in milliseconds.
///
/// Falls back to 0 if the system clock is before the Unix epoch.
#[must_use]
pub fn current_timestamp_millis() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}
