//! Structured logging configuration.

use crate::config::LoggingSettings;
use std::path::PathBuf;

/// Default filter directive.
pub const DEFAULT_FILTER: &str = "promptshelf=info";

/// Filter directive used when verbose output is requested.
pub const VERBOSE_FILTER: &str = "promptshelf=debug";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable multi-line output.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    /// Parses a format string, defaulting to pretty.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Pretty,
        }
    }
}

/// Resolved logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// `EnvFilter` directive.
    pub filter: String,
    /// Output format.
    pub format: LogFormat,
    /// Optional log file; stderr otherwise.
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_FILTER.to_string(),
            format: LogFormat::default(),
            file: None,
        }
    }
}

impl LoggingConfig {
    /// Builds logging config from file settings, env and the verbose flag.
    ///
    /// Precedence for the filter: `RUST_LOG`, then `--verbose`, then the
    /// config file level, then [`DEFAULT_FILTER`].
    #[must_use]
    pub fn from_settings(settings: Option<&LoggingSettings>, verbose: bool) -> Self {
        let env_filter = std::env::var("RUST_LOG")
            .ok()
            .filter(|v| !v.trim().is_empty());
        Self::resolve(settings, verbose, env_filter)
    }

    fn resolve(
        settings: Option<&LoggingSettings>,
        verbose: bool,
        env_filter: Option<String>,
    ) -> Self {
        let file_level = settings.and_then(|s| s.level.clone());
        let filter = env_filter
            .or_else(|| verbose.then(|| VERBOSE_FILTER.to_string()))
            .or(file_level)
            .unwrap_or_else(|| DEFAULT_FILTER.to_string());

        let format = settings
            .and_then(|s| s.format.as_deref())
            .map_or_else(LogFormat::default, LogFormat::parse);

        Self {
            filter,
            format,
            file: settings.and_then(|s| s.file.clone()),
        }
    }
}
