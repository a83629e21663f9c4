//! CLI command implementations.
//!
//! This module provides the command-line interface for promptshelf. The
//! binary parses arguments and calls into these functions.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `list` | List every prompt |
//! | `search` | Search prompts (`@tag` for tag search) |
//! | `add` | Add a prompt |
//! | `edit` | Change fields of a prompt |
//! | `show` | Show one prompt |
//! | `copy` | Print a prompt's raw content |
//! | `delete` | Delete a prompt |
//! | `tags` | List all tags |
//! | `suggest` | Tag suggestions for an `@` query |
//! | `browse` | Interactive session |
//!
//! # Example Usage
//!
//! ```bash
//! promptshelf add --title "Greeting" --content "Hello there" --tags casual
//! promptshelf search @cas
//! promptshelf copy 1718035200000 | pbcopy
//! ```

mod browse;
mod prompt;

pub use browse::{BrowseCommand, cmd_browse, run_browse};
pub use prompt::{
    OutputFormat, cmd_add, cmd_copy, cmd_delete, cmd_edit, cmd_list, cmd_search, cmd_show,
    cmd_suggest, cmd_tags, open_store, render_detail, render_table,
};
