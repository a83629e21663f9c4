//! Prompt search.
//!
//! Two modes, chosen by the trimmed query:
//!
//! - `@tag` - tag-prefix mode: matches prompts with a tag containing `tag`.
//!   A bare `@` matches everything.
//! - anything else - plain mode: matches title, content or any tag.
//!
//! Matching is case-insensitive substring containment. Results keep the
//! collection order; there is no ranking.

use crate::models::{Prompt, fold};

/// Character that switches a query into tag-prefix mode.
pub const TAG_SIGIL: char = '@';

/// A parsed search query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchQuery {
    /// Empty query, or a bare sigil: no filtering.
    All,
    /// Tag-prefix mode with the case-folded tag fragment.
    Tag(String),
    /// Plain mode with the case-folded text.
    Text(String),
}

impl SearchQuery {
    /// Parses raw query text.
    ///
    /// # Examples
    ///
    /// ```
    /// use promptshelf::services::SearchQuery;
    ///
    /// assert_eq!(SearchQuery::parse("  "), SearchQuery::All);
    /// assert_eq!(SearchQuery::parse("@"), SearchQuery::All);
    /// assert_eq!(SearchQuery::parse("@ Work"), SearchQuery::Tag("work".into()));
    /// assert_eq!(SearchQuery::parse("Hello"), SearchQuery::Text("hello".into()));
    /// ```
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Self::All;
        }

        match trimmed.strip_prefix(TAG_SIGIL) {
            Some(rest) => {
                let tag = rest.trim();
                if tag.is_empty() {
                    Self::All
                } else {
                    Self::Tag(fold(tag))
                }
            },
            None => Self::Text(fold(trimmed)),
        }
    }

    /// Whether a prompt matches this query.
    #[must_use]
    pub fn matches(&self, prompt: &Prompt) -> bool {
        match self {
            Self::All => true,
            Self::Tag(tag) => prompt.has_tag_containing(tag),
            Self::Text(text) => {
                fold(&prompt.title).contains(text.as_str())
                    || fold(&prompt.content).contains(text.as_str())
                    || prompt.has_tag_containing(text)
            },
        }
    }
}

/// Whether the trimmed query is in tag-prefix mode.
#[must_use]
pub fn is_tag_query(raw: &str) -> bool {
    raw.trim().starts_with(TAG_SIGIL)
}

/// Filters the collection by a query, preserving order.
///
/// # Examples
///
/// ```
/// use promptshelf::{Prompt, search};
///
/// let prompts = vec![
///     Prompt::new("1", "Greeting", "Hello there").with_tags(vec!["casual".into()]),
///     Prompt::new("2", "Formal", "Dear Sir").with_tags(vec!["work".into(), "formal".into()]),
/// ];
/// assert_eq!(search(&prompts, "hello")[0].id.as_str(), "1");
/// assert_eq!(search(&prompts, "@form")[0].id.as_str(), "2");
/// ```
#[must_use]
pub fn search<'a>(prompts: &'a [Prompt], query: &str) -> Vec<&'a Prompt> {
    let query = SearchQuery::parse(query);
    tracing::trace!(?query, "searching prompts");
    prompts.iter().filter(|p| query.matches(p)).collect()
}
