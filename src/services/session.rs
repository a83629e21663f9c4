//! Interactive session: explicit command dispatch over the prompt store.
//!
//! A [`Session`] owns the store, the current query, the autocomplete state
//! and an open detail view. Front ends send [`Intent`]s to
//! [`Session::dispatch`] and render the [`SessionView`] snapshot. Errors never
//! escape `dispatch`; they become [`Notice`]s.

use super::autocomplete::{Autocomplete, Direction};
use super::prompt_store::PromptStore;
use super::search::search;
use crate::Error;
use crate::models::{Prompt, PromptForm, PromptId};
use tracing::{debug, info};

/// A user intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// The search text changed.
    Search(String),
    /// Submit a create/edit form.
    Save(PromptForm),
    /// Delete a prompt (already confirmed by the user).
    Delete(PromptId),
    /// Move the suggestion cursor.
    Navigate(Direction),
    /// Confirm the highlighted suggestion, or re-run the literal query.
    ConfirmSuggestion,
    /// Pick a suggestion directly (mouse click).
    SelectSuggestion(usize),
    /// Close the suggestion list.
    DismissSuggestions,
    /// Open the detail view of a prompt.
    Open(PromptId),
    /// Close the detail view.
    CloseDetail,
    /// Copy a prompt's content.
    Copy(PromptId),
}

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    /// Informational.
    Info,
    /// The request was rejected; input needs fixing.
    Warning,
    /// Something failed; retrying may help.
    Error,
}

/// A user-visible message produced by a dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Severity.
    pub level: NoticeLevel,
    /// Message text.
    pub message: String,
}

impl Notice {
    /// Creates an info notice.
    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    /// Converts an operation error into a notice.
    #[must_use]
    pub fn from_error(context: &str, error: &Error) -> Self {
        let (level, message) = match error {
            Error::Validation(reason) => (NoticeLevel::Warning, format!("{context}: {reason}")),
            Error::NotFound(id) => (NoticeLevel::Warning, format!("{context}: no prompt {id}")),
            Error::Persistence { .. } => (
                NoticeLevel::Error,
                format!("{context}: could not save prompts, please try again ({error})"),
            ),
            Error::OperationFailed { .. } => (NoticeLevel::Error, format!("{context}: {error}")),
        };
        Self { level, message }
    }
}

/// What a dispatch produced besides the new view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Only the view changed (or nothing did).
    Updated,
    /// A prompt was created or updated.
    Saved(Prompt),
    /// A prompt was removed.
    Deleted(Prompt),
    /// Content to put on the clipboard.
    Copied(String),
}

/// Snapshot of everything a renderer needs.
#[derive(Debug)]
pub struct SessionView<'a> {
    /// The current query text.
    pub query: &'a str,
    /// Prompts matching the query, in collection order.
    pub results: Vec<&'a Prompt>,
    /// Current tag suggestions.
    pub suggestions: &'a [String],
    /// Highlighted suggestion index.
    pub selected: Option<usize>,
    /// The prompt whose detail view is open.
    pub detail: Option<&'a Prompt>,
    /// Pending notices, oldest first.
    pub notices: &'a [Notice],
}

/// One interactive session over a prompt store.
#[derive(Debug)]
pub struct Session {
    store: PromptStore,
    query: String,
    autocomplete: Autocomplete,
    detail: Option<PromptId>,
    notices: Vec<Notice>,
}

impl Session {
    /// Opens a session, loading the persisted collection.
    ///
    /// A failed load starts the session empty with an error notice.
    #[must_use]
    pub fn open(mut store: PromptStore) -> Self {
        let report = store.load();
        let mut session = Self::with_store(store);
        if let Some(error) = report.error {
            session.notices.push(Notice::from_error("Could not load prompts", &error));
        }
        session
    }

    /// Wraps an already-loaded store.
    #[must_use]
    pub fn with_store(store: PromptStore) -> Self {
        Self {
            store,
            query: String::new(),
            autocomplete: Autocomplete::new(),
            detail: None,
            notices: Vec::new(),
        }
    }

    /// Returns the underlying store.
    #[must_use]
    pub const fn store(&self) -> &PromptStore {
        &self.store
    }

    /// Returns the current query.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Returns the autocomplete state.
    #[must_use]
    pub const fn autocomplete(&self) -> &Autocomplete {
        &self.autocomplete
    }

    /// Returns the prompts matching the current query.
    #[must_use]
    pub fn results(&self) -> Vec<&Prompt> {
        search(self.store.prompts(), &self.query)
    }

    /// Returns a snapshot for rendering.
    #[must_use]
    pub fn view(&self) -> SessionView<'_> {
        SessionView {
            query: &self.query,
            results: self.results(),
            suggestions: self.autocomplete.suggestions(),
            selected: self.autocomplete.cursor().index(),
            detail: self.detail.as_ref().and_then(|id| self.store.find(id)),
            notices: &self.notices,
        }
    }

    /// Removes and returns pending notices.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Applies an intent.
    pub fn dispatch(&mut self, intent: Intent) -> Outcome {
        debug!(?intent, "dispatch");
        match intent {
            Intent::Search(text) => {
                self.set_query(text.trim().to_string());
                Outcome::Updated
            },
            Intent::Save(form) => self.save(&form),
            Intent::Delete(id) => self.delete(&id),
            Intent::Navigate(direction) => {
                self.autocomplete.navigate(direction);
                Outcome::Updated
            },
            Intent::ConfirmSuggestion => {
                self.query = self.autocomplete.confirm(&self.query);
                Outcome::Updated
            },
            Intent::SelectSuggestion(index) => {
                if self.autocomplete.select(index) {
                    self.query = self.autocomplete.confirm(&self.query);
                }
                Outcome::Updated
            },
            Intent::DismissSuggestions => {
                self.autocomplete.dismiss();
                Outcome::Updated
            },
            Intent::Open(id) => {
                if self.store.find(&id).is_some() {
                    self.detail = Some(id);
                } else {
                    self.notices
                        .push(Notice::from_error("Open", &Error::NotFound(id.to_string())));
                }
                Outcome::Updated
            },
            Intent::CloseDetail => {
                self.detail = None;
                Outcome::Updated
            },
            Intent::Copy(id) => match self.store.find(&id) {
                Some(prompt) => {
                    info!(id = %id, "prompt copied");
                    Outcome::Copied(prompt.content.clone())
                },
                None => {
                    self.notices
                        .push(Notice::from_error("Copy", &Error::NotFound(id.to_string())));
                    Outcome::Updated
                },
            },
        }
    }

    fn set_query(&mut self, query: String) {
        self.query = query;
        self.autocomplete.refresh(self.store.prompts(), &self.query);
    }

    /// Keeps the suggestion list in step with the collection after a mutation.
    fn refresh_suggestions(&mut self) {
        if self.autocomplete.is_open() {
            self.autocomplete.refresh(self.store.prompts(), &self.query);
        }
    }

    fn save(&mut self, form: &PromptForm) -> Outcome {
        let result = self.store.save_form(form);
        self.refresh_suggestions();
        match result {
            Ok(prompt) => {
                self.detail = None;
                self.notices.push(Notice::info(format!("Saved \"{}\"", prompt.title)));
                Outcome::Saved(prompt)
            },
            Err(error) => {
                self.notices
                    .push(Notice::from_error("Save failed", &error));
                Outcome::Updated
            },
        }
    }

    fn delete(&mut self, id: &PromptId) -> Outcome {
        let result = self.store.delete(id);
        self.refresh_suggestions();
        if self.detail.as_ref() == Some(id) {
            self.detail = None;
        }
        match result {
            Ok(prompt) => {
                self.notices.push(Notice::info(format!("Deleted \"{}\"", prompt.title)));
                Outcome::Deleted(prompt)
            },
            Err(error) => {
                self.notices
                    .push(Notice::from_error("Delete failed", &error));
                Outcome::Updated
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::CursorState;
    use crate::storage::{MemoryKeyValueStore, PromptStorageAdapter};
    use serde_json::json;
    use std::sync::Arc;

    fn seeded_session() -> Session {
        let kv = MemoryKeyValueStore::with_record(
            "prompts",
            json!([
                {"id": "1", "title": "Greeting", "content": "Hello there", "tags": ["casual"]},
                {"id": "2", "title": "Formal", "content": "Dear Sir", "tags": ["work", "formal"]},
            ]),
        );
        Session::open(PromptStore::new(PromptStorageAdapter::new(Arc::new(kv))))
    }

    fn result_ids(session: &Session) -> Vec<String> {
        session.results().iter().map(|p| p.id.to_string()).collect()
    }

    #[test]
    fn test_open_loads_everything() {
        let session = seeded_session();
        assert_eq!(result_ids(&session), vec!["1", "2"]);
        assert!(session.view().notices.is_empty());
    }

    #[test]
    fn test_open_with_bad_record_starts_empty_with_notice() {
        let kv = MemoryKeyValueStore::with_record("prompts", json!("garbage"));
        let session = Session::open(PromptStore::new(PromptStorageAdapter::new(Arc::new(kv))));
        assert!(session.results().is_empty());
        assert_eq!(session.view().notices[0].level, NoticeLevel::Error);
    }

    #[test]
    fn test_search_intent_filters_and_suggests() {
        let mut session = seeded_session();
        session.dispatch(Intent::Search("  @ca ".to_string()));

        assert_eq!(session.query(), "@ca");
        assert_eq!(result_ids(&session), vec!["1"]);
        assert_eq!(session.view().suggestions, ["casual".to_string()]);
        assert_eq!(session.view().selected, None);
    }

    #[test]
    fn test_confirm_selected_suggestion_rewrites_query() {
        let mut session = seeded_session();
        session.dispatch(Intent::Search("@or".to_string()));
        assert_eq!(session.view().suggestions.len(), 2);

        session.dispatch(Intent::Navigate(Direction::Previous));
        assert_eq!(session.view().selected, Some(1));
        session.dispatch(Intent::ConfirmSuggestion);

        assert_eq!(session.query(), "@formal");
        assert!(session.view().suggestions.is_empty());
        assert_eq!(result_ids(&session), vec!["2"]);
    }

    #[test]
    fn test_confirm_without_selection_keeps_literal_query() {
        let mut session = seeded_session();
        session.dispatch(Intent::Search("@or".to_string()));
        session.dispatch(Intent::ConfirmSuggestion);

        assert_eq!(session.query(), "@or");
        assert!(session.view().suggestions.is_empty());
        assert_eq!(result_ids(&session), vec!["2"]);
    }

    #[test]
    fn test_select_suggestion_by_index() {
        let mut session = seeded_session();
        session.dispatch(Intent::Search("@".to_string()));
        session.dispatch(Intent::SelectSuggestion(1));
        assert_eq!(session.query(), "@work");

        // Out-of-range picks leave everything as is.
        session.dispatch(Intent::Search("@".to_string()));
        session.dispatch(Intent::SelectSuggestion(9));
        assert_eq!(session.query(), "@");
        assert_eq!(session.view().suggestions.len(), 3);
    }

    #[test]
    fn test_dismiss_keeps_query() {
        let mut session = seeded_session();
        session.dispatch(Intent::Search("@w".to_string()));
        session.dispatch(Intent::Navigate(Direction::Next));
        session.dispatch(Intent::DismissSuggestions);

        assert_eq!(session.query(), "@w");
        assert!(session.view().suggestions.is_empty());
        assert_eq!(session.autocomplete().cursor(), CursorState::NoSelection);
    }

    #[test]
    fn test_save_new_prompt_refreshes_results() {
        let mut session = seeded_session();
        session.dispatch(Intent::Search("draft".to_string()));
        assert!(session.results().is_empty());

        let outcome = session.dispatch(Intent::Save(
            PromptForm::new("Draft", "A rough draft").with_tags("writing"),
        ));
        assert!(matches!(outcome, Outcome::Saved(_)));
        assert_eq!(session.results().len(), 1);
        assert_eq!(session.take_notices()[0].level, NoticeLevel::Info);
    }

    #[test]
    fn test_save_invalid_form_is_warning() {
        let mut session = seeded_session();
        let outcome = session.dispatch(Intent::Save(PromptForm::new("", "body")));
        assert_eq!(outcome, Outcome::Updated);
        assert_eq!(session.store().len(), 2);
        let notices = session.take_notices();
        assert_eq!(notices[0].level, NoticeLevel::Warning);
        assert!(session.view().notices.is_empty());
    }

    #[test]
    fn test_save_updates_open_suggestions() {
        let mut session = seeded_session();
        session.dispatch(Intent::Search("@ca".to_string()));
        session.dispatch(Intent::Navigate(Direction::Next));
        session.dispatch(Intent::Save(
            PromptForm::new("Chat", "Hey").with_tags("Casualish"),
        ));

        assert_eq!(
            session.view().suggestions,
            ["casual".to_string(), "casualish".to_string()]
        );
        assert_eq!(session.view().selected, None);
    }

    #[test]
    fn test_delete_closes_detail() {
        let mut session = seeded_session();
        session.dispatch(Intent::Open(PromptId::new("2")));
        assert_eq!(session.view().detail.map(|p| p.title.as_str()), Some("Formal"));

        let outcome = session.dispatch(Intent::Delete(PromptId::new("2")));
        assert!(matches!(outcome, Outcome::Deleted(_)));
        assert!(session.view().detail.is_none());
        assert_eq!(result_ids(&session), vec!["1"]);
    }

    #[test]
    fn test_delete_unknown_is_warning() {
        let mut session = seeded_session();
        session.dispatch(Intent::Delete(PromptId::new("nope")));
        assert_eq!(session.store().len(), 2);
        assert_eq!(session.view().notices[0].level, NoticeLevel::Warning);
    }

    #[test]
    fn test_copy() {
        let mut session = seeded_session();
        assert_eq!(
            session.dispatch(Intent::Copy(PromptId::new("1"))),
            Outcome::Copied("Hello there".to_string())
        );
        assert_eq!(
            session.dispatch(Intent::Copy(PromptId::new("9"))),
            Outcome::Updated
        );
        assert_eq!(session.view().notices.len(), 1);
    }

    #[test]
    fn test_open_unknown_and_close_detail() {
        let mut session = seeded_session();
        session.dispatch(Intent::Open(PromptId::new("9")));
        assert!(session.view().detail.is_none());
        assert_eq!(session.view().notices.len(), 1);

        session.dispatch(Intent::Open(PromptId::new("1")));
        session.dispatch(Intent::CloseDetail);
        assert!(session.view().detail.is_none());
    }
}
