//! Prompt snippet models.
//!
//! A [`Prompt`] is one saved snippet: a title, the content that gets copied,
//! and free-form tags. Tags keep the case the user typed; every comparison
//! against them is case-insensitive.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{Error, Result};

/// Separator for the tag field of a prompt form.
pub const TAG_SEPARATOR: char = ',';

/// Opaque, unique prompt identifier.
///
/// Minted from a clock-derived value at creation and never reused.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PromptId(String);

impl PromptId {
    /// Creates a prompt ID from an existing string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the numeric clock value the ID was minted from, if any.
    ///
    /// IDs written by other tools may not be numeric.
    #[must_use]
    pub fn clock_value(&self) -> Option<u64> {
        self.0.parse().ok()
    }
}

impl fmt::Display for PromptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<String> for PromptId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for PromptId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<u64> for PromptId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

/// A saved prompt snippet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prompt {
    /// Unique identifier.
    pub id: PromptId,
    /// Display title.
    pub title: String,
    /// The payload that gets copied.
    pub content: String,
    /// Free-form tags, in the order they were typed.
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Prompt {
    /// Creates a prompt with the given id and fields.
    #[must_use]
    pub fn new(
        id: impl Into<PromptId>,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            content: content.into(),
            tags: Vec::new(),
        }
    }

    /// Sets the tags.
    #[must_use]
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    /// Returns the tags case-folded, in order.
    pub fn folded_tags(&self) -> impl Iterator<Item = String> + '_ {
        self.tags.iter().map(String::as_str).map(fold)
    }

    /// Whether any tag contains `needle`, which must already be case-folded.
    #[must_use]
    pub fn has_tag_containing(&self, needle: &str) -> bool {
        self.folded_tags().any(|t| t.contains(needle))
    }

    /// Returns a single-line preview of the content.
    #[must_use]
    pub fn preview(&self, max_chars: usize) -> String {
        let flat: String = self
            .content
            .chars()
            .map(|c| if c.is_whitespace() { ' ' } else { c })
            .collect();
        if flat.chars().count() <= max_chars {
            return flat;
        }
        let mut cut: String = flat.chars().take(max_chars).collect();
        cut.push_str("...");
        cut
    }
}

/// The fields submitted by a prompt form.
///
/// An empty `id` means "create"; otherwise the form updates that prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptForm {
    /// Id of the prompt being edited, if any.
    pub id: Option<PromptId>,
    /// Raw title field.
    pub title: String,
    /// Raw content field.
    pub content: String,
    /// Raw comma-separated tags field.
    pub tags: String,
}

impl PromptForm {
    /// Creates a form for a new prompt.
    #[must_use]
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            content: content.into(),
            tags: String::new(),
        }
    }

    /// Creates a form pre-filled from an existing prompt, for editing.
    #[must_use]
    pub fn edit(prompt: &Prompt) -> Self {
        Self {
            id: Some(prompt.id.clone()),
            title: prompt.title.clone(),
            content: prompt.content.clone(),
            tags: prompt.tags.join(", "),
        }
    }

    /// Sets the raw tags field.
    #[must_use]
    pub fn with_tags(mut self, tags: impl Into<String>) -> Self {
        self.tags = tags.into();
        self
    }

    /// Returns the parsed tag list.
    #[must_use]
    pub fn parsed_tags(&self) -> Vec<String> {
        parse_tags(&self.tags)
    }
}

/// Case-folds text for comparison.
///
/// Each character is lowered on its own, so the result does not depend on
/// where a character sits in a word (a final `Σ` folds to `σ`, not `ς`).
/// Queries, titles, content and tags must all go through this one function
/// for substring matches to hold.
///
/// # Examples
///
/// ```
/// use promptshelf::fold;
///
/// assert_eq!(fold("ΟΔΟΣ"), "οδοσ");
/// assert!(fold("ΟΔΟΣ").contains(&fold("Σ")));
/// ```
#[must_use]
pub fn fold(text: &str) -> String {
    text.chars().flat_map(char::to_lowercase).collect()
}

/// Splits a comma-separated tag field, trimming and dropping empty entries.
///
/// Duplicates are kept; case is preserved.
///
/// # Examples
///
/// ```
/// use promptshelf::parse_tags;
///
/// assert_eq!(parse_tags(" work, , Formal ,"), vec!["work", "Formal"]);
/// ```
#[must_use]
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(TAG_SEPARATOR)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Trims title and content and rejects either being empty.
///
/// # Errors
///
/// Returns [`Error::Validation`] if the trimmed title or content is empty.
pub fn validate_fields(title: &str, content: &str) -> Result<(String, String)> {
    let title = title.trim();
    let content = content.trim();

    match (title.is_empty(), content.is_empty()) {
        (true, true) => Err(Error::Validation(
            "title and content are required".to_string(),
        )),
        (true, false) => Err(Error::Validation("title is required".to_string())),
        (false, true) => Err(Error::Validation("content is required".to_string())),
        (false, false) => Ok((title.to_string(), content.to_string())),
    }
}
