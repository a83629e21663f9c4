//! Configuration management.
//!
//! Configuration is read from a TOML file. Every field is optional; missing
//! fields fall back to the defaults below.
//!
//! ```toml
//! data_dir = "~/.local/share/promptshelf"
//!
//! [storage]
//! backend = "sqlite"   # memory | filesystem | sqlite
//! key = "prompts"
//!
//! [logging]
//! level = "debug"
//! format = "json"      # pretty | json
//! file = "/tmp/promptshelf.log"
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::storage::DEFAULT_RECORD_KEY;
use crate::{Error, Result};

/// File name of the `SQLite` database inside the data directory.
pub const SQLITE_FILE_NAME: &str = "promptshelf.db";

/// Main configuration for promptshelf.
#[derive(Debug, Clone)]
pub struct PromptshelfConfig {
    /// Path to the data directory.
    pub data_dir: PathBuf,
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Logging settings from the config file.
    pub logging: LoggingSettings,
    /// The file this configuration was read from, if any.
    pub config_source: Option<PathBuf>,
}

/// Storage backend configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    /// Backend type.
    pub backend: StorageBackendType,
    /// Explicit backend path; derived from the data directory when unset.
    pub path: Option<PathBuf>,
    /// Key of the prompt collection record.
    pub key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackendType::default(),
            path: None,
            key: DEFAULT_RECORD_KEY.to_string(),
        }
    }
}

/// Available key-value backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageBackendType {
    /// Process memory.
    Memory,
    /// One JSON file per key.
    #[default]
    Filesystem,
    /// `SQLite` database.
    Sqlite,
}

impl StorageBackendType {
    /// Parses a backend string.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown backend name.
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "memory" | "mem" => Ok(Self::Memory),
            "filesystem" | "fs" | "file" => Ok(Self::Filesystem),
            "sqlite" => Ok(Self::Sqlite),
            other => Err(Error::OperationFailed {
                operation: "parse_storage_backend".to_string(),
                cause: format!("unknown backend '{other}' (expected memory, filesystem or sqlite)"),
            }),
        }
    }

    /// Returns the backend name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Filesystem => "filesystem",
            Self::Sqlite => "sqlite",
        }
    }
}

/// Logging section of the config file.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct LoggingSettings {
    /// Filter directive, e.g. `debug` or `promptshelf=trace`.
    pub level: Option<String>,
    /// Output format: `pretty` or `json`.
    pub format: Option<String>,
    /// Optional log file; logs go to stderr otherwise.
    pub file: Option<PathBuf>,
}

/// Configuration file structure (for TOML parsing).
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    /// Data directory.
    pub data_dir: Option<String>,
    /// Storage section.
    pub storage: Option<ConfigFileStorage>,
    /// Logging section.
    pub logging: Option<LoggingSettings>,
}

/// Storage section in config file.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileStorage {
    /// Backend name.
    pub backend: Option<String>,
    /// Backend path.
    pub path: Option<String>,
    /// Record key.
    pub key: Option<String>,
}

impl Default for PromptshelfConfig {
    fn default() -> Self {
        let data_dir = directories::ProjectDirs::from("", "", "promptshelf")
            .map_or_else(|| PathBuf::from(".promptshelf"), |d| d.data_dir().to_path_buf());
        Self {
            data_dir,
            storage: StorageConfig::default(),
            logging: LoggingSettings::default(),
            config_source: None,
        }
    }
}

impl PromptshelfConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::OperationFailed {
            operation: "read_config_file".to_string(),
            cause: format!("{}: {e}", path.display()),
        })?;

        let mut config = Self::from_toml(&contents)?;
        config.config_source = Some(path.to_path_buf());
        Ok(config)
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid configuration.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(contents).map_err(|e| Error::OperationFailed {
            operation: "parse_config_file".to_string(),
            cause: e.to_string(),
        })?;

        Self::from_config_file(file)
    }

    /// Returns the default config file location.
    ///
    /// `<platform config dir>/promptshelf/config.toml`
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "promptshelf")
            .map(|d| d.config_dir().join("config.toml"))
    }

    /// Loads configuration from `path`, or defaults if there is no file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_if_exists(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads configuration from the default location.
    ///
    /// Returns default configuration if there is no default location or no
    /// file there.
    ///
    /// # Errors
    ///
    /// Returns an error if the default file exists but cannot be read or
    /// parsed. Callers that want to carry on can fall back to
    /// [`PromptshelfConfig::default`] and report the error once logging is
    /// up.
    pub fn try_load_default() -> Result<Self> {
        Self::default_path().map_or_else(|| Ok(Self::default()), |path| Self::load_if_exists(&path))
    }

    /// Converts a `ConfigFile` to `PromptshelfConfig`.
    fn from_config_file(file: ConfigFile) -> Result<Self> {
        let mut config = Self::default();

        if let Some(data_dir) = file.data_dir {
            config.data_dir = PathBuf::from(data_dir);
        }
        if let Some(storage) = file.storage {
            if let Some(backend) = storage.backend {
                config.storage.backend = StorageBackendType::parse(&backend)?;
            }
            config.storage.path = storage.path.map(PathBuf::from);
            if let Some(key) = storage.key.filter(|k| !k.trim().is_empty()) {
                config.storage.key = key;
            }
        }
        if let Some(logging) = file.logging {
            config.logging = logging;
        }

        Ok(config)
    }

    /// Sets the data directory.
    #[must_use]
    pub fn with_data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_dir = path.into();
        self
    }

    /// Sets the storage backend.
    #[must_use]
    pub const fn with_backend(mut self, backend: StorageBackendType) -> Self {
        self.storage.backend = backend;
        self
    }

    /// Returns the storage configuration with its path resolved against the
    /// data directory.
    #[must_use]
    pub fn resolved_storage(&self) -> StorageConfig {
        let mut storage = self.storage.clone();
        if storage.path.is_none() {
            storage.path = match storage.backend {
                StorageBackendType::Memory => None,
                StorageBackendType::Filesystem => Some(self.data_dir.clone()),
                StorageBackendType::Sqlite => Some(self.data_dir.join(SQLITE_FILE_NAME)),
            };
        }
        storage
    }
}
