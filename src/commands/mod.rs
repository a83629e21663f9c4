//! Command handlers module.
//!
//! Binary-side handlers that need more than a call into `promptshelf::cli`:
//! - `config.rs`: Configuration display command

mod config;

pub use config::cmd_config;
