//! Tag autocomplete for `@` queries.
//!
//! Suggestions are the distinct case-folded tags containing the partial tag
//! typed after the sigil, in first-discovery order (prompts in collection
//! order, tags in the order they were typed).
//!
//! [`Autocomplete`] keeps the suggestion list together with a selection
//! cursor. The cursor wraps in both directions and resets to
//! [`CursorState::NoSelection`] whenever the query or the list changes.

use super::search::{TAG_SIGIL, is_tag_query};
use crate::models::{Prompt, fold};
use std::collections::HashSet;

/// Returns the distinct case-folded tags across the collection.
///
/// Ordered by first discovery.
#[must_use]
pub fn available_tags(prompts: &[Prompt]) -> Vec<String> {
    let mut seen = HashSet::new();
    prompts
        .iter()
        .flat_map(Prompt::folded_tags)
        .filter(|tag| seen.insert(tag.clone()))
        .collect()
}

/// Returns tag suggestions for a sigil-prefixed query.
///
/// Non-sigil queries get no suggestions. A bare sigil suggests every tag.
///
/// # Examples
///
/// ```
/// use promptshelf::{Prompt, suggest};
///
/// let prompts = vec![
///     Prompt::new("1", "Greeting", "Hello").with_tags(vec!["casual".into()]),
///     Prompt::new("2", "Formal", "Dear Sir").with_tags(vec!["work".into()]),
/// ];
/// assert_eq!(suggest(&prompts, "@ca"), vec!["casual"]);
/// assert!(suggest(&prompts, "ca").is_empty());
/// ```
#[must_use]
pub fn suggest(prompts: &[Prompt], query: &str) -> Vec<String> {
    if !is_tag_query(query) {
        return Vec::new();
    }
    let fragment = fold(
        query
            .trim()
            .strip_prefix(TAG_SIGIL)
            .unwrap_or_default()
            .trim(),
    );

    available_tags(prompts)
        .into_iter()
        .filter(|tag| tag.contains(fragment.as_str()))
        .collect()
}

/// Selection state of the suggestion cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorState {
    /// Nothing highlighted.
    #[default]
    NoSelection,
    /// The suggestion at this index is highlighted.
    SelectedAt(usize),
}

impl CursorState {
    /// Returns the selected index, if any.
    #[must_use]
    pub const fn index(self) -> Option<usize> {
        match self {
            Self::NoSelection => None,
            Self::SelectedAt(i) => Some(i),
        }
    }

    /// Whether a suggestion is highlighted.
    #[must_use]
    pub const fn is_selected(self) -> bool {
        matches!(self, Self::SelectedAt(_))
    }
}

/// Cursor movement direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Move down (arrow down).
    Next,
    /// Move up (arrow up).
    Previous,
}

/// Suggestion list plus selection cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Autocomplete {
    suggestions: Vec<String>,
    cursor: CursorState,
}

impl Autocomplete {
    /// Creates an empty autocomplete state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current suggestions.
    #[must_use]
    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    /// Returns the cursor state.
    #[must_use]
    pub const fn cursor(&self) -> CursorState {
        self.cursor
    }

    /// Returns the highlighted suggestion, if any.
    #[must_use]
    pub fn selected(&self) -> Option<&str> {
        self.cursor
            .index()
            .and_then(|i| self.suggestions.get(i))
            .map(String::as_str)
    }

    /// Whether the suggestion list is showing.
    #[must_use]
    pub fn is_open(&self) -> bool {
        !self.suggestions.is_empty()
    }

    /// Recomputes suggestions for a new query and resets the cursor.
    pub fn refresh(&mut self, prompts: &[Prompt], query: &str) {
        self.suggestions = suggest(prompts, query);
        self.cursor = CursorState::NoSelection;
    }

    /// Moves the cursor, wrapping at both ends.
    ///
    /// From no selection, `Next` lands on the first entry and `Previous` on
    /// the last. A no-op when there are no suggestions.
    pub fn navigate(&mut self, direction: Direction) {
        let n = self.suggestions.len();
        if n == 0 {
            return;
        }
        let next = match (self.cursor, direction) {
            (CursorState::NoSelection, Direction::Next) => 0,
            (CursorState::NoSelection, Direction::Previous) => n - 1,
            (CursorState::SelectedAt(i), Direction::Next) => (i + 1) % n,
            (CursorState::SelectedAt(i), Direction::Previous) => (i + n - 1) % n,
        };
        self.cursor = CursorState::SelectedAt(next);
    }

    /// Highlights the suggestion at `index`.
    ///
    /// Returns false (and leaves the cursor alone) if out of range.
    pub fn select(&mut self, index: usize) -> bool {
        if index < self.suggestions.len() {
            self.cursor = CursorState::SelectedAt(index);
            true
        } else {
            false
        }
    }

    /// Confirms the current state and closes the list.
    ///
    /// Returns the query to search with: `@<tag>` when a suggestion is
    /// highlighted, otherwise `current_query` unchanged.
    pub fn confirm(&mut self, current_query: &str) -> String {
        let query = self.selected().map_or_else(
            || current_query.to_string(),
            |tag| format!("{TAG_SIGIL}{tag}"),
        );
        self.dismiss();
        query
    }

    /// Closes the list and clears the selection.
    pub fn dismiss(&mut self) {
        self.suggestions.clear();
        self.cursor = CursorState::NoSelection;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prompts() -> Vec<Prompt> {
        vec![
            Prompt::new("1", "Greeting", "Hello there").with_tags(vec!["casual".to_string()]),
            Prompt::new("2", "Formal", "Dear Sir")
                .with_tags(vec!["Work".to_string(), "formal".to_string()]),
            Prompt::new("3", "Memo", "Notes").with_tags(vec![
                "work".to_string(),
                "casual".to_string(),
                "café".to_string(),
            ]),
        ]
    }

    fn open(query: &str) -> Autocomplete {
        let mut ac = Autocomplete::new();
        ac.refresh(&prompts(), query);
        ac
    }

    #[test]
    fn test_available_tags_distinct_folded_in_discovery_order() {
        assert_eq!(
            available_tags(&prompts()),
            vec!["casual", "work", "formal", "café"]
        );
    }

    #[test]
    fn test_suggest_scenario() {
        assert_eq!(suggest(&prompts(), "@ca"), vec!["casual", "café"]);
        assert_eq!(suggest(&prompts(), "@WOR"), vec!["work"]);
        assert_eq!(suggest(&prompts(), " @ or "), vec!["work", "formal"]);
    }

    #[test]
    fn test_suggest_folds_word_final_sigma() {
        let prompts = vec![Prompt::new("1", "T", "C").with_tags(vec!["ΝΟΜΟΣ".to_string()])];
        assert_eq!(suggest(&prompts, "@Σ"), vec!["νομοσ"]);
        assert_eq!(suggest(&prompts, "@μοσ"), vec!["νομοσ"]);
    }

    #[test]
    fn test_suggest_bare_sigil_lists_all() {
        assert_eq!(suggest(&prompts(), "@").len(), 4);
    }

    #[test]
    fn test_suggest_inactive_without_sigil() {
        assert!(suggest(&prompts(), "casual").is_empty());
        assert!(suggest(&prompts(), "").is_empty());
    }

    #[test]
    fn test_navigate_wraps_forward() {
        let mut ac = open("@");
        let n = ac.suggestions().len();
        ac.navigate(Direction::Next);
        let start = ac.cursor();
        for _ in 0..n {
            ac.navigate(Direction::Next);
        }
        assert_eq!(ac.cursor(), start);
    }

    #[test]
    fn test_navigate_previous_from_zero_wraps_to_last() {
        let mut ac = open("@");
        ac.navigate(Direction::Next);
        assert_eq!(ac.cursor(), CursorState::SelectedAt(0));
        ac.navigate(Direction::Previous);
        assert_eq!(ac.cursor(), CursorState::SelectedAt(3));
    }

    #[test]
    fn test_navigate_previous_from_none_selects_last() {
        let mut ac = open("@");
        ac.navigate(Direction::Previous);
        assert_eq!(ac.cursor(), CursorState::SelectedAt(3));
    }

    #[test]
    fn test_navigate_noop_when_empty() {
        let mut ac = open("@zzz");
        ac.navigate(Direction::Next);
        ac.navigate(Direction::Previous);
        assert_eq!(ac.cursor(), CursorState::NoSelection);
    }

    #[test]
    fn test_refresh_resets_cursor() {
        let mut ac = open("@");
        ac.navigate(Direction::Next);
        ac.refresh(&prompts(), "@w");
        assert_eq!(ac.cursor(), CursorState::NoSelection);
    }

    #[test]
    fn test_confirm_with_selection() {
        let mut ac = open("@ca");
        ac.navigate(Direction::Next);
        assert_eq!(ac.selected(), Some("casual"));
        assert_eq!(ac.confirm("@ca"), "@casual");
        assert!(!ac.is_open());
        assert_eq!(ac.cursor(), CursorState::NoSelection);
    }

    #[test]
    fn test_confirm_without_selection_keeps_query() {
        let mut ac = open("@ca");
        assert_eq!(ac.confirm("@ca"), "@ca");
        assert!(!ac.is_open());
    }

    #[test]
    fn test_dismiss() {
        let mut ac = open("@");
        ac.navigate(Direction::Next);
        ac.dismiss();
        assert!(ac.suggestions().is_empty());
        assert_eq!(ac.cursor(), CursorState::NoSelection);
    }

    #[test]
    fn test_cursor_state_index() {
        assert_eq!(CursorState::SelectedAt(2).index(), Some(2));
        assert!(CursorState::SelectedAt(0).is_selected());
        assert_eq!(CursorState::NoSelection.index(), None);
        assert!(!CursorState::NoSelection.is_selected());
    }

    #[test]
    fn test_select_out_of_range() {
        let mut ac = open("@ca");
        assert!(!ac.select(5));
        assert_eq!(ac.cursor(), CursorState::NoSelection);
        assert!(ac.select(1));
        assert_eq!(ac.selected(), Some("café"));
    }
}
