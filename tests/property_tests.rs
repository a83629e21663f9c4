//! Property-based tests for search and autocomplete.
//!
//! Uses proptest to verify invariants across random collections:
//! - Empty and bare-sigil queries return the collection unchanged
//! - Any title substring finds its prompt, in any letter case
//! - Tag mode never matches on title or content alone
//! - Suggestions only appear for sigil queries
//! - The suggestion cursor wraps in both directions

// Property tests use expect/unwrap for simplicity - panics are acceptable in tests
#![allow(clippy::expect_used, clippy::unwrap_used)]

use proptest::prelude::*;
use promptshelf::{
    Autocomplete, CursorState, Direction, Prompt, fold, parse_tags, search, suggest,
};

fn arb_tag() -> impl Strategy<Value = String> {
    "[a-zA-Z]{1,8}"
}

fn arb_prompt() -> impl Strategy<Value = Prompt> {
    (
        any::<u32>(),
        "[a-zA-Z ]{1,24}",
        "[a-zA-Z0-9 .,]{1,64}",
        prop::collection::vec(arb_tag(), 0..4),
    )
        .prop_map(|(id, title, content, tags)| {
            Prompt::new(u64::from(id), title, content).with_tags(tags)
        })
}

/// Titles mixing ASCII with Greek, German and Turkish letters whose
/// lowercase forms depend on context or change length.
fn arb_unicode_prompt() -> impl Strategy<Value = Prompt> {
    (any::<u32>(), "[a-zA-ZΣσςΟΔöÖßİı ]{1,24}", prop::collection::vec("[a-zΣΟΔß]{1,6}", 0..3))
        .prop_map(|(id, title, tags)| Prompt::new(u64::from(id), title, "body").with_tags(tags))
}

fn arb_collection() -> impl Strategy<Value = Vec<Prompt>> {
    prop::collection::vec(arb_prompt(), 0..20)
}

proptest! {
    /// Property: the empty query is the identity.
    #[test]
    fn prop_empty_query_returns_everything(prompts in arb_collection(), pad in " {0,3}") {
        let results = search(&prompts, &pad);
        prop_assert_eq!(results.len(), prompts.len());
        for (result, prompt) in results.iter().zip(&prompts) {
            prop_assert!(std::ptr::eq(*result, prompt));
        }
    }

    /// Property: a bare sigil is the identity.
    #[test]
    fn prop_bare_sigil_returns_everything(prompts in arb_collection()) {
        prop_assert_eq!(search(&prompts, "@").len(), prompts.len());
    }

    /// Property: every title substring finds its prompt.
    #[test]
    fn prop_title_substring_matches(
        prompts in prop::collection::vec(arb_prompt(), 1..10),
        pick in any::<prop::sample::Index>(),
        start in 0usize..24,
        len in 1usize..24,
    ) {
        let target = &prompts[pick.index(prompts.len())];
        let chars: Vec<char> = target.title.chars().collect();
        let start = start.min(chars.len() - 1);
        let end = (start + len).min(chars.len());
        let needle: String = chars[start..end].iter().collect();
        prop_assume!(!needle.trim().is_empty());

        let results = search(&prompts, &needle);
        prop_assert!(results.iter().any(|p| std::ptr::eq(*p, target)));
    }

    /// Property: every substring of a non-ASCII title finds its prompt.
    #[test]
    fn prop_unicode_title_substring_matches(
        prompts in prop::collection::vec(arb_unicode_prompt(), 1..10),
        pick in any::<prop::sample::Index>(),
        start in 0usize..24,
        len in 1usize..24,
    ) {
        let target = &prompts[pick.index(prompts.len())];
        let chars: Vec<char> = target.title.chars().collect();
        let start = start.min(chars.len() - 1);
        let end = (start + len).min(chars.len());
        let needle: String = chars[start..end].iter().collect();
        prop_assume!(!needle.trim().is_empty());

        let results = search(&prompts, &needle);
        prop_assert!(results.iter().any(|p| std::ptr::eq(*p, target)));
    }

    /// Property: search ignores letter case.
    #[test]
    fn prop_search_case_insensitive(prompts in arb_collection(), query in "@?[a-zA-Z]{1,4}") {
        let lower = search(&prompts, &query.to_lowercase());
        let upper = search(&prompts, &query.to_uppercase());
        prop_assert_eq!(lower, upper);
    }

    /// Property: results preserve collection order.
    #[test]
    fn prop_search_preserves_order(prompts in arb_collection(), query in "@?[a-z]{1,2}") {
        let positions: Vec<usize> = search(&prompts, &query)
            .into_iter()
            .map(|r| prompts.iter().position(|p| std::ptr::eq(p, r)).unwrap())
            .collect();
        prop_assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    /// Property: tag mode only ever matches through tags.
    #[test]
    fn prop_tag_mode_excludes_title_and_content(prompts in arb_collection(), tag in "[a-z]{1,3}") {
        for result in search(&prompts, &format!("@{tag}")) {
            prop_assert!(result.tags.iter().any(|t| fold(t).contains(&tag)));
        }
    }

    /// Property: no suggestions without a leading sigil.
    #[test]
    fn prop_suggest_empty_for_plain_queries(prompts in arb_collection(), query in "[a-zA-Z ]{0,8}") {
        prop_assert!(suggest(&prompts, &query).is_empty());
    }

    /// Property: suggestions are distinct and case-folded.
    #[test]
    fn prop_suggestions_distinct_and_folded(prompts in arb_collection(), fragment in "[a-z]{0,2}") {
        let suggestions = suggest(&prompts, &format!("@{fragment}"));
        for (i, s) in suggestions.iter().enumerate() {
            prop_assert_eq!(s, &fold(s));
            prop_assert!(s.contains(&fragment));
            prop_assert!(!suggestions[i + 1..].contains(s));
        }
    }

    /// Property: `Next` n times from the first entry comes back to it, and
    /// `Previous` from the first entry lands on the last.
    #[test]
    fn prop_cursor_wraps(tags in prop::collection::hash_set(arb_tag(), 1..8)) {
        let tags: Vec<String> = tags.into_iter().collect();
        let prompts = vec![Prompt::new("1", "t", "c").with_tags(tags)];
        let mut autocomplete = Autocomplete::new();
        autocomplete.refresh(&prompts, "@");
        let n = autocomplete.suggestions().len();
        prop_assume!(n > 0);

        autocomplete.navigate(Direction::Next);
        prop_assert_eq!(autocomplete.cursor(), CursorState::SelectedAt(0));
        for _ in 0..n {
            autocomplete.navigate(Direction::Next);
        }
        prop_assert_eq!(autocomplete.cursor(), CursorState::SelectedAt(0));

        autocomplete.navigate(Direction::Previous);
        prop_assert_eq!(autocomplete.cursor(), CursorState::SelectedAt(n - 1));
    }

    /// Property: parsed tags are trimmed and never empty.
    #[test]
    fn prop_parse_tags_trimmed_non_empty(raw in "[a-z ,]{0,40}") {
        for tag in parse_tags(&raw) {
            prop_assert!(!tag.is_empty());
            prop_assert_eq!(tag.trim(), tag.as_str());
        }
    }
}
