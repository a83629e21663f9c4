//! Prompt CLI commands.
//!
//! One-shot subcommands over the persisted collection. Each command opens
//! the store described by the configuration, does its work and exits.

// CLI commands are allowed to use println! for output
#![allow(clippy::print_stdout)]
// CLI commands take owned strings from clap parsing
#![allow(clippy::needless_pass_by_value)]

use crate::config::PromptshelfConfig;
use crate::models::{Prompt, PromptForm, PromptId};
use crate::services::{PromptStore, available_tags, search, suggest};
use crate::storage::{KeyValueStoreFactory, PromptStorageAdapter};
use crate::{Error, Result};
use std::io::{self, BufRead, Write};

/// Width of the content preview column.
const PREVIEW_CHARS: usize = 40;

/// Output format for prompt commands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Table format (default).
    #[default]
    Table,
    /// JSON format.
    Json,
}

impl OutputFormat {
    /// Parses output format from string.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Table,
        }
    }
}

/// Opens and loads the prompt store described by the configuration.
///
/// Unlike an interactive session, a one-shot command refuses to run on a
/// collection it could not read, so a later save cannot overwrite it.
///
/// # Errors
///
/// Returns an error if the backend cannot be created or the stored
/// collection cannot be read.
pub fn open_store(config: &PromptshelfConfig) -> Result<PromptStore> {
    let storage = config.resolved_storage();
    let kv = KeyValueStoreFactory::from_config(&storage)?;
    let adapter = PromptStorageAdapter::with_key(kv, storage.key);
    let mut store = PromptStore::new(adapter);

    let report = store.load();
    match report.error {
        Some(e) => Err(e),
        None => Ok(store),
    }
}

/// Executes the `list` subcommand.
///
/// # Errors
///
/// Returns an error if the store cannot be opened.
pub fn cmd_list(
    config: &PromptshelfConfig,
    format: Option<String>,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let store = open_store(config)?;
    let prompts: Vec<&Prompt> = store.prompts().iter().collect();
    print_prompts(&prompts, parse_format(format.as_deref()))
}

/// Executes the `search` subcommand.
///
/// # Errors
///
/// Returns an error if the store cannot be opened.
pub fn cmd_search(
    config: &PromptshelfConfig,
    query: String,
    format: Option<String>,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let store = open_store(config)?;
    let results = search(store.prompts(), &query);
    print_prompts(&results, parse_format(format.as_deref()))
}

/// Executes the `add` subcommand.
///
/// # Errors
///
/// Returns an error if the fields are invalid or the save fails.
pub fn cmd_add(
    config: &PromptshelfConfig,
    title: String,
    content: String,
    tags: Option<String>,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let mut store = open_store(config)?;
    let form = PromptForm::new(title, content).with_tags(tags.unwrap_or_default());
    let prompt = store.save_form(&form)?;

    println!("Prompt saved: {} ({})", prompt.title, prompt.id);
    Ok(())
}

/// Executes the `edit` subcommand.
///
/// Fields that are not given keep their current value.
///
/// # Errors
///
/// Returns an error if the prompt does not exist, the resulting fields are
/// invalid, or the save fails.
pub fn cmd_edit(
    config: &PromptshelfConfig,
    id: String,
    title: Option<String>,
    content: Option<String>,
    tags: Option<String>,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let mut store = open_store(config)?;
    let form = edit_form(&store, &PromptId::new(id), title, content, tags)?;
    let prompt = store.save_form(&form)?;

    println!("Prompt updated: {} ({})", prompt.title, prompt.id);
    Ok(())
}

/// Builds an edit form from the stored prompt and the given overrides.
fn edit_form(
    store: &PromptStore,
    id: &PromptId,
    title: Option<String>,
    content: Option<String>,
    tags: Option<String>,
) -> Result<PromptForm> {
    let current = store
        .find(id)
        .ok_or_else(|| Error::NotFound(id.to_string()))?;

    let mut form = PromptForm::edit(current);
    if let Some(title) = title {
        form.title = title;
    }
    if let Some(content) = content {
        form.content = content;
    }
    if let Some(tags) = tags {
        form.tags = tags;
    }
    Ok(form)
}

/// Executes the `show` subcommand.
///
/// # Errors
///
/// Returns an error if the prompt does not exist.
pub fn cmd_show(
    config: &PromptshelfConfig,
    id: String,
    format: Option<String>,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let store = open_store(config)?;
    let id = PromptId::new(id);
    let prompt = store
        .find(&id)
        .ok_or_else(|| Error::NotFound(id.to_string()))?;

    match parse_format(format.as_deref()) {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(prompt)?),
        OutputFormat::Table => print!("{}", render_detail(prompt)),
    }
    Ok(())
}

/// Executes the `copy` subcommand: writes the raw content to stdout.
///
/// # Errors
///
/// Returns an error if the prompt does not exist.
pub fn cmd_copy(
    config: &PromptshelfConfig,
    id: String,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let store = open_store(config)?;
    let id = PromptId::new(id);
    let prompt = store
        .find(&id)
        .ok_or_else(|| Error::NotFound(id.to_string()))?;

    let mut stdout = io::stdout().lock();
    stdout.write_all(prompt.content.as_bytes())?;
    stdout.flush()?;
    tracing::info!(id = %id, "prompt copied");
    Ok(())
}

/// Executes the `delete` subcommand.
///
/// Asks for confirmation on stdin unless `force` is set.
///
/// # Errors
///
/// Returns an error if the prompt does not exist or the save fails.
pub fn cmd_delete(
    config: &PromptshelfConfig,
    id: String,
    force: bool,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let mut store = open_store(config)?;
    let id = PromptId::new(id);
    let title = store
        .find(&id)
        .map(|p| p.title.clone())
        .ok_or_else(|| Error::NotFound(id.to_string()))?;

    if !force {
        print!("Delete prompt '{title}'? [y/N]: ");
        io::stdout().flush()?;
        let stdin = io::stdin();
        if !confirm(&mut stdin.lock())? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let removed = store.delete(&id)?;
    println!("Prompt '{}' deleted.", removed.title);
    Ok(())
}

/// Reads one line and accepts `y` or `yes`.
pub(crate) fn confirm(input: &mut impl BufRead) -> io::Result<bool> {
    let mut line = String::new();
    input.read_line(&mut line)?;
    let answer = line.trim();
    Ok(answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes"))
}

/// Executes the `tags` subcommand.
///
/// # Errors
///
/// Returns an error if the store cannot be opened.
pub fn cmd_tags(config: &PromptshelfConfig) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let store = open_store(config)?;
    for tag in available_tags(store.prompts()) {
        println!("{tag}");
    }
    Ok(())
}

/// Executes the `suggest` subcommand.
///
/// # Errors
///
/// Returns an error if the store cannot be opened.
pub fn cmd_suggest(
    config: &PromptshelfConfig,
    query: String,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let store = open_store(config)?;
    for tag in suggest(store.prompts(), &query) {
        println!("{tag}");
    }
    Ok(())
}

fn parse_format(format: Option<&str>) -> OutputFormat {
    format.map_or(OutputFormat::Table, OutputFormat::parse)
}

fn print_prompts(
    prompts: &[&Prompt],
    format: OutputFormat,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(prompts)?),
        OutputFormat::Table => print!("{}", render_table(prompts)),
    }
    Ok(())
}

/// Renders prompts as a table.
#[must_use]
pub fn render_table(prompts: &[&Prompt]) -> String {
    if prompts.is_empty() {
        return "No prompts found.\n".to_string();
    }

    let mut out = format!(
        "{:<15} {:<24} {:<43} TAGS\n{}\n",
        "ID",
        "TITLE",
        "CONTENT",
        "-".repeat(90)
    );
    for prompt in prompts {
        let title: String = prompt.title.chars().take(24).collect();
        out.push_str(&format!(
            "{:<15} {:<24} {:<43} {}\n",
            prompt.id,
            title,
            prompt.preview(PREVIEW_CHARS),
            prompt.tags.join(", ")
        ));
    }
    out.push_str(&format!("\nTotal: {} prompts\n", prompts.len()));
    out
}

/// Renders the detail view of one prompt.
#[must_use]
pub fn render_detail(prompt: &Prompt) -> String {
    let mut out = format!("ID: {}\nTitle: {}\n", prompt.id, prompt.title);
    if !prompt.tags.is_empty() {
        out.push_str(&format!("Tags: {}\n", prompt.tags.join(", ")));
    }
    out.push_str(&format!("\n{}\n", prompt.content));
    out
}
