//! Config command handler.
//!
//! Contains the implementation of the `config` CLI command and
//! display helpers for configuration output.

use promptshelf::config::{LoggingSettings, PromptshelfConfig, StorageBackendType};
use promptshelf::observability::DEFAULT_FILTER;

/// Config command.
pub fn cmd_config(config: &PromptshelfConfig) -> Result<(), Box<dyn std::error::Error>> {
    println!("Current Configuration");
    println!("=====================");
    println!();

    match &config.config_source {
        Some(path) => println!("Config File: {}", path.display()),
        None => println!("Config File: (none - using defaults)"),
    }
    println!("Data Directory: {}", config.data_dir.display());
    println!();

    println!("Storage:");
    display_storage_config(config);
    println!();

    println!("Logging:");
    display_logging_config(&config.logging);

    Ok(())
}

/// Helper to display storage configuration.
fn display_storage_config(config: &PromptshelfConfig) {
    let storage = config.resolved_storage();
    println!("  Backend: {}", storage.backend.as_str());
    println!("  Record Key: {}", storage.key);
    match (storage.backend, storage.path) {
        (StorageBackendType::Memory, _) => println!("  Location: (in memory, not persisted)"),
        (_, Some(path)) => println!("  Location: {}", path.display()),
        (_, None) => println!("  Location: (platform default)"),
    }
}

/// Helper to display logging configuration.
fn display_logging_config(logging: &LoggingSettings) {
    println!(
        "  Level: {}",
        logging.level.as_deref().unwrap_or(DEFAULT_FILTER)
    );
    println!(
        "  Format: {}",
        logging.format.as_deref().unwrap_or("pretty")
    );
    match &logging.file {
        Some(file) => println!("  File: {}", file.display()),
        None => println!("  File: (stderr)"),
    }
}
