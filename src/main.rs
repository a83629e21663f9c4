//! Binary entry point for promptshelf.
//!
//! This binary provides the CLI interface for the promptshelf snippet store.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow print_stderr in main binary for CLI output
#![allow(clippy::print_stderr)]
#![allow(clippy::print_stdout)]
// Allow unnecessary_wraps for consistent command function signatures
#![allow(clippy::unnecessary_wraps)]
// Allow needless_pass_by_value for command functions
#![allow(clippy::needless_pass_by_value)]
// Allow multiple crate versions from transitive dependencies
#![allow(clippy::multiple_crate_versions)]

mod commands;

use clap::{Parser, Subcommand};
use commands::cmd_config;
use promptshelf::cli::{
    cmd_add, cmd_browse, cmd_copy, cmd_delete, cmd_edit, cmd_list, cmd_search, cmd_show,
    cmd_suggest, cmd_tags,
};
use promptshelf::config::{PromptshelfConfig, StorageBackendType};
use promptshelf::observability::{self, InitOptions};
use std::path::PathBuf;
use std::process::ExitCode;

/// Promptshelf - store, search and copy tagged prompt snippets.
#[derive(Parser)]
#[command(name = "promptshelf")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file.
    #[arg(short, long, global = true, env = "PROMPTSHELF_CONFIG_PATH")]
    config: Option<PathBuf>,

    /// Override the data directory.
    #[arg(long, global = true, env = "PROMPTSHELF_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Override the storage backend: memory, filesystem, or sqlite.
    #[arg(long, global = true, env = "PROMPTSHELF_STORAGE_BACKEND")]
    backend: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// List all prompts.
    List {
        /// Output format: table or json.
        #[arg(short, long)]
        format: Option<String>,
    },

    /// Search prompts. Start the query with @ to search tags.
    Search {
        /// The search query.
        query: String,

        /// Output format: table or json.
        #[arg(short, long)]
        format: Option<String>,
    },

    /// Add a prompt.
    Add {
        /// Prompt title.
        #[arg(short, long)]
        title: String,

        /// Prompt content.
        #[arg(long)]
        content: String,

        /// Tags (comma-separated).
        #[arg(long)]
        tags: Option<String>,
    },

    /// Edit a prompt. Fields that are not given are kept.
    Edit {
        /// Prompt id.
        id: String,

        /// New title.
        #[arg(short, long)]
        title: Option<String>,

        /// New content.
        #[arg(long)]
        content: Option<String>,

        /// New tags (comma-separated, replaces all tags).
        #[arg(long)]
        tags: Option<String>,
    },

    /// Show a prompt.
    Show {
        /// Prompt id.
        id: String,

        /// Output format: table or json.
        #[arg(short, long)]
        format: Option<String>,
    },

    /// Print a prompt's raw content, ready to pipe into a clipboard tool.
    Copy {
        /// Prompt id.
        id: String,
    },

    /// Delete a prompt.
    Delete {
        /// Prompt id.
        id: String,

        /// Skip confirmation.
        #[arg(short, long)]
        force: bool,
    },

    /// List all tags.
    Tags,

    /// Suggest tags for an @ query.
    Suggest {
        /// The partial tag query, e.g. @ca.
        query: String,
    },

    /// Browse prompts interactively.
    Browse,

    /// Show the effective configuration.
    Config,
}

/// Main entry point.
fn main() -> ExitCode {
    let cli = Cli::parse();

    let (config, ignored) = match load_config(&cli) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        },
    };

    if let Err(e) = observability::init_from_settings(
        &config.logging,
        InitOptions {
            verbose: cli.verbose,
        },
    ) {
        eprintln!("Failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    if let Some(e) = ignored {
        tracing::warn!("ignoring unreadable config: {e}");
    }

    match run_command(cli.command, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        },
    }
}

/// Runs the selected command.
fn run_command(
    command: Commands,
    config: &PromptshelfConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::List { format } => cmd_list(config, format),
        Commands::Search { query, format } => cmd_search(config, query, format),
        Commands::Add {
            title,
            content,
            tags,
        } => cmd_add(config, title, content, tags),
        Commands::Edit {
            id,
            title,
            content,
            tags,
        } => cmd_edit(config, id, title, content, tags),
        Commands::Show { id, format } => cmd_show(config, id, format),
        Commands::Copy { id } => cmd_copy(config, id),
        Commands::Delete { id, force } => cmd_delete(config, id, force),
        Commands::Tags => cmd_tags(config),
        Commands::Suggest { query } => cmd_suggest(config, query),
        Commands::Browse => cmd_browse(config),
        Commands::Config => cmd_config(config),
    }
}

/// Loads configuration and applies command-line overrides.
///
/// An explicit `--config` file must load. A broken file at the default
/// location is skipped and returned alongside the defaults, to be logged
/// once the subscriber is installed.
fn load_config(
    cli: &Cli,
) -> Result<(PromptshelfConfig, Option<promptshelf::Error>), Box<dyn std::error::Error>> {
    let (mut config, ignored) = match cli.config.as_deref() {
        Some(path) => (PromptshelfConfig::load_from_file(path)?, None),
        None => match PromptshelfConfig::try_load_default() {
            Ok(config) => (config, None),
            Err(e) => (PromptshelfConfig::default(), Some(e)),
        },
    };

    if let Some(data_dir) = &cli.data_dir {
        config = config.with_data_dir(data_dir.clone());
    }
    if let Some(backend) = &cli.backend {
        config = config.with_backend(StorageBackendType::parse(backend)?);
    }

    Ok((config, ignored))
}
