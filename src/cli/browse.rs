//! Interactive `browse` command.
//!
//! A line-driven front end over a [`Session`]. Plain text replaces the
//! search query; lines starting with `:` are commands:
//!
//! | Command | Effect |
//! |---------|--------|
//! | `:next` / `:prev` | Move the suggestion cursor |
//! | `:enter` | Confirm the highlighted suggestion |
//! | `:esc` | Close the suggestion list |
//! | `:pick <n>` | Pick suggestion `n` (1-based) |
//! | `:open <id>` / `:close` | Open or close the detail view |
//! | `:copy [id]` | Print the raw content |
//! | `:new` / `:edit [id]` | Fill in the prompt form |
//! | `:delete [id]` | Delete after confirmation |
//! | `:help` / `:quit` | |
//!
//! `:copy`, `:edit` and `:delete` act on the open prompt when no id is given.

use super::prompt::confirm;
use crate::config::PromptshelfConfig;
use crate::models::{Prompt, PromptForm, PromptId};
use crate::services::{Direction, Intent, NoticeLevel, Outcome, PromptStore, Session, SessionView};
use crate::storage::{KeyValueStoreFactory, PromptStorageAdapter};
use crate::{Error, Result};
use std::io::{self, BufRead, Write};

const HELP: &str = "\
Type text to search, @tag for tag search.
  :next :prev      move through tag suggestions
  :enter :esc      confirm or close suggestions
  :pick <n>        pick suggestion n
  :open <id>       show a prompt      :close  hide it
  :copy [id]       print a prompt's content
  :new             add a prompt       :edit [id]  edit one
  :delete [id]     delete a prompt
  :quit            leave
Without an id, :copy, :edit and :delete use the open prompt.";

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseCommand {
    /// Dispatch straight to the session.
    Intent(Intent),
    /// Print a prompt's content; `None` means the open prompt.
    Copy(Option<PromptId>),
    /// Delete, after asking; `None` means the open prompt.
    Delete(Option<PromptId>),
    /// Fill in a form for a new prompt.
    New,
    /// Fill in a form pre-filled from an existing prompt; `None` means the
    /// open prompt.
    Edit(Option<PromptId>),
    /// Show the command list.
    Help,
    /// Leave the session.
    Quit,
}

impl BrowseCommand {
    /// Parses one input line.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for an unknown command or a missing or
    /// malformed argument.
    pub fn parse(line: &str) -> Result<Self> {
        let line = line.trim();
        let Some(command) = line.strip_prefix(':') else {
            return Ok(Self::Intent(Intent::Search(line.to_string())));
        };

        let (name, arg) = command
            .split_once(char::is_whitespace)
            .map_or((command, ""), |(n, a)| (n, a.trim()));

        match name {
            "next" | "n" => Ok(Self::Intent(Intent::Navigate(Direction::Next))),
            "prev" | "p" => Ok(Self::Intent(Intent::Navigate(Direction::Previous))),
            "enter" => Ok(Self::Intent(Intent::ConfirmSuggestion)),
            "esc" => Ok(Self::Intent(Intent::DismissSuggestions)),
            "pick" => {
                let n: usize = arg
                    .parse()
                    .map_err(|_| Error::Validation(format!("not a suggestion number: '{arg}'")))?;
                let index = n
                    .checked_sub(1)
                    .ok_or_else(|| Error::Validation("suggestions are numbered from 1".to_string()))?;
                Ok(Self::Intent(Intent::SelectSuggestion(index)))
            },
            "open" => Ok(Self::Intent(Intent::Open(required_id(name, arg)?))),
            "close" => Ok(Self::Intent(Intent::CloseDetail)),
            "copy" => Ok(Self::Copy(optional_id(arg))),
            "delete" => Ok(Self::Delete(optional_id(arg))),
            "new" => Ok(Self::New),
            "edit" => Ok(Self::Edit(optional_id(arg))),
            "help" | "h" | "?" => Ok(Self::Help),
            "quit" | "q" => Ok(Self::Quit),
            other => Err(Error::Validation(format!(
                "unknown command ':{other}' (try :help)"
            ))),
        }
    }
}

fn required_id(command: &str, arg: &str) -> Result<PromptId> {
    if arg.is_empty() {
        Err(Error::Validation(format!(":{command} needs a prompt id")))
    } else {
        Ok(PromptId::new(arg))
    }
}

fn optional_id(arg: &str) -> Option<PromptId> {
    (!arg.is_empty()).then(|| PromptId::new(arg))
}

/// Resolves a command's id, falling back to the prompt in the detail view.
fn target(session: &Session, id: Option<PromptId>) -> Option<PromptId> {
    id.or_else(|| session.view().detail.map(|p| p.id.clone()))
}

/// Executes the `browse` subcommand on stdin/stdout.
///
/// # Errors
///
/// Returns an error if the backend cannot be created or the terminal cannot
/// be read or written.
pub fn cmd_browse(config: &PromptshelfConfig) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let storage = config.resolved_storage();
    let kv = KeyValueStoreFactory::from_config(&storage)?;
    let store = PromptStore::new(PromptStorageAdapter::with_key(kv, storage.key));
    let mut session = Session::open(store);

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout().lock();
    run_browse(&mut session, &mut input, &mut output)?;
    Ok(())
}

/// Runs the read-dispatch-render loop until `:quit` or end of input.
///
/// # Errors
///
/// Returns an error if reading input or writing output fails.
pub fn run_browse(
    session: &mut Session,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> io::Result<()> {
    writeln!(output, "{HELP}")?;
    render(output, &session.view())?;
    session.take_notices();

    while let Some(line) = read_field(input, output, "> ")? {
        let command = match BrowseCommand::parse(&line) {
            Ok(command) => command,
            Err(e) => {
                writeln!(output, "! {e}")?;
                continue;
            },
        };

        match command {
            BrowseCommand::Quit => break,
            BrowseCommand::Help => {
                writeln!(output, "{HELP}")?;
                continue;
            },
            BrowseCommand::Intent(intent) => {
                if let Outcome::Copied(content) = session.dispatch(intent) {
                    writeln!(output, "{content}")?;
                }
            },
            BrowseCommand::Copy(id) => {
                let Some(id) = target(session, id) else {
                    writeln!(output, "! no prompt open; give an id")?;
                    continue;
                };
                if let Outcome::Copied(content) = session.dispatch(Intent::Copy(id)) {
                    writeln!(output, "{content}")?;
                }
            },
            BrowseCommand::Delete(id) => {
                let Some(id) = target(session, id) else {
                    writeln!(output, "! no prompt open; give an id")?;
                    continue;
                };
                let title = session.store().find(&id).map(|p| p.title.clone());
                match title {
                    Some(title) => {
                        write!(output, "Delete prompt '{title}'? [y/N]: ")?;
                        output.flush()?;
                        if confirm(input)? {
                            session.dispatch(Intent::Delete(id));
                        } else {
                            writeln!(output, "Cancelled.")?;
                        }
                    },
                    // Unknown ids go through so the session reports them.
                    None => {
                        session.dispatch(Intent::Delete(id));
                    },
                }
            },
            BrowseCommand::New => {
                if let Some(form) = fill_form(input, output, None)? {
                    session.dispatch(Intent::Save(form));
                }
            },
            BrowseCommand::Edit(id) => {
                let Some(id) = target(session, id) else {
                    writeln!(output, "! no prompt open; give an id")?;
                    continue;
                };
                let current = session.store().find(&id).cloned();
                match current {
                    Some(prompt) => {
                        if let Some(form) = fill_form(input, output, Some(&prompt))? {
                            session.dispatch(Intent::Save(form));
                        }
                    },
                    None => writeln!(output, "! no prompt {id}")?,
                }
            },
        }

        render(output, &session.view())?;
        session.take_notices();
    }

    Ok(())
}

/// Asks for each form field. A blank answer keeps the current value when
/// editing. Returns `None` if input ends midway.
fn fill_form(
    input: &mut impl BufRead,
    output: &mut impl Write,
    current: Option<&Prompt>,
) -> io::Result<Option<PromptForm>> {
    let mut form = current.map(PromptForm::edit).unwrap_or_default();

    for (label, field) in [
        ("Title", &mut form.title),
        ("Content", &mut form.content),
        ("Tags (comma separated)", &mut form.tags),
    ] {
        let prompt = if field.is_empty() {
            format!("{label}: ")
        } else {
            format!("{label} [{field}]: ")
        };
        let Some(answer) = read_field(input, output, &prompt)? else {
            return Ok(None);
        };
        if current.is_none() || !answer.trim().is_empty() {
            *field = answer;
        }
    }

    Ok(Some(form))
}

/// Writes `prompt` and reads one line without its terminator.
fn read_field(
    input: &mut impl BufRead,
    output: &mut impl Write,
    prompt: &str,
) -> io::Result<Option<String>> {
    write!(output, "{prompt}")?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
}

fn render(output: &mut impl Write, view: &SessionView<'_>) -> io::Result<()> {
    writeln!(output)?;
    if !view.query.is_empty() {
        writeln!(output, "Search: {}", view.query)?;
    }

    if !view.suggestions.is_empty() {
        writeln!(output, "Tags:")?;
        for (i, tag) in view.suggestions.iter().enumerate() {
            let marker = if view.selected == Some(i) { '>' } else { ' ' };
            writeln!(output, " {marker}{:>2}. @{tag}", i + 1)?;
        }
    }

    if view.results.is_empty() {
        writeln!(output, "No prompts found.")?;
    }
    for prompt in &view.results {
        let tags = if prompt.tags.is_empty() {
            String::new()
        } else {
            format!("  [{}]", prompt.tags.join(", "))
        };
        writeln!(
            output,
            "  {:<15} {}: {}{tags}",
            prompt.id,
            prompt.title,
            prompt.preview(40)
        )?;
    }

    if let Some(prompt) = view.detail {
        writeln!(output)?;
        write!(output, "{}", super::prompt::render_detail(prompt))?;
    }

    for notice in view.notices {
        let sigil = match notice.level {
            NoticeLevel::Info => '*',
            NoticeLevel::Warning | NoticeLevel::Error => '!',
        };
        writeln!(output, "{sigil} {}", notice.message)?;
    }
    Ok(())
}
