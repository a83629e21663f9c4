//! Prompt store: the owned in-memory collection.
//!
//! Every mutation is validated first, applied in memory, then persisted by
//! writing the whole collection through the [`PromptStorageAdapter`]. A failed
//! write is reported but not rolled back: the in-memory change stays visible
//! and the next successful save will carry it.

use crate::models::{Prompt, PromptForm, PromptId, validate_fields};
use crate::storage::PromptStorageAdapter;
use crate::{Error, Result, current_timestamp_millis};
use tracing::{debug, error, info, instrument, warn};

/// Outcome of [`PromptStore::load`].
///
/// Loading never fails; a storage error leaves the store empty and is
/// returned here for the caller to surface.
#[derive(Debug)]
pub struct LoadReport {
    /// Number of prompts now in the store.
    pub loaded: usize,
    /// The storage error, if the load failed.
    pub error: Option<Error>,
}

impl LoadReport {
    /// Whether the load succeeded.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Mints strictly increasing clock-derived ids.
///
/// When the clock has not moved past the last id (same millisecond, clock
/// stepped back, or a loaded id from the future), the previous value is
/// bumped by one instead. Once the last id is `u64::MAX` there is nothing
/// left to bump to and minting fails rather than repeat an id.
#[derive(Debug, Default, Clone, Copy)]
struct IdMinter {
    last: u64,
}

impl IdMinter {
    fn observe(&mut self, id: &PromptId) {
        if let Some(value) = id.clock_value() {
            self.last = self.last.max(value);
        }
    }

    fn mint(&mut self, now_millis: u64) -> Result<PromptId> {
        let next = if now_millis > self.last {
            now_millis
        } else {
            self.last
                .checked_add(1)
                .ok_or_else(|| Error::OperationFailed {
                    operation: "mint_prompt_id".to_string(),
                    cause: format!("id space exhausted after {}", self.last),
                })?
        };
        self.last = next;
        Ok(PromptId::from(next))
    }
}

/// The prompt collection for one session.
#[derive(Debug)]
pub struct PromptStore {
    adapter: PromptStorageAdapter,
    prompts: Vec<Prompt>,
    minter: IdMinter,
    clock: fn() -> u64,
}

impl PromptStore {
    /// Creates an empty store over the given adapter.
    ///
    /// Call [`load`](Self::load) to read the persisted collection.
    #[must_use]
    pub fn new(adapter: PromptStorageAdapter) -> Self {
        Self {
            adapter,
            prompts: Vec::new(),
            minter: IdMinter::default(),
            clock: current_timestamp_millis,
        }
    }

    /// Replaces the id clock (milliseconds since the epoch).
    #[must_use]
    pub fn with_clock(mut self, clock: fn() -> u64) -> Self {
        self.clock = clock;
        self
    }

    /// Returns the storage adapter.
    #[must_use]
    pub const fn adapter(&self) -> &PromptStorageAdapter {
        &self.adapter
    }

    /// Returns the prompts in collection order.
    #[must_use]
    pub fn prompts(&self) -> &[Prompt] {
        &self.prompts
    }

    /// Returns the number of prompts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.prompts.len()
    }

    /// Whether the store holds no prompts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.prompts.is_empty()
    }

    /// Replaces the collection with the persisted one.
    ///
    /// A missing record loads as empty. Any storage error also leaves the
    /// store empty; the error is returned in the report, never raised.
    #[instrument(skip(self))]
    pub fn load(&mut self) -> LoadReport {
        match self.adapter.load() {
            Ok(prompts) => {
                self.prompts = prompts;
                for prompt in &self.prompts {
                    self.minter.observe(&prompt.id);
                }
                debug!(count = self.prompts.len(), "prompt store loaded");
                LoadReport {
                    loaded: self.prompts.len(),
                    error: None,
                }
            },
            Err(e) => {
                error!("failed to load prompts: {e}");
                self.prompts.clear();
                LoadReport {
                    loaded: 0,
                    error: Some(e),
                }
            },
        }
    }

    /// Finds a prompt by id.
    #[must_use]
    pub fn find(&self, id: &PromptId) -> Option<&Prompt> {
        self.prompts.iter().find(|p| &p.id == id)
    }

    fn position(&self, id: &PromptId) -> Result<usize> {
        self.prompts
            .iter()
            .position(|p| &p.id == id)
            .ok_or_else(|| Error::NotFound(id.to_string()))
    }

    /// Creates a prompt, appends it, and persists the collection.
    ///
    /// # Errors
    ///
    /// - [`Error::Validation`] if the trimmed title or content is empty
    ///   (nothing is changed).
    /// - [`Error::OperationFailed`] if no unused numeric id is left (nothing
    ///   is changed).
    /// - [`Error::Persistence`] if the save fails; the new prompt stays in
    ///   memory.
    #[instrument(skip(self, content, tags))]
    pub fn create(
        &mut self,
        title: &str,
        content: &str,
        tags: Vec<String>,
    ) -> Result<Prompt> {
        let (title, content) = validate_fields(title, content).inspect_err(|e| {
            warn!("rejected new prompt: {e}");
        })?;

        let id = self.minter.mint((self.clock)()).inspect_err(|e| {
            error!("could not mint prompt id: {e}");
        })?;
        let prompt = Prompt {
            id,
            title,
            content,
            tags,
        };
        self.prompts.push(prompt.clone());
        info!(id = %prompt.id, "prompt created");

        self.persist()?;
        Ok(prompt)
    }

    /// Replaces a prompt in place and persists the collection.
    ///
    /// # Errors
    ///
    /// - [`Error::NotFound`] if no prompt has `id` (nothing is changed).
    /// - [`Error::Validation`] as for [`create`](Self::create).
    /// - [`Error::Persistence`] if the save fails; the update stays in memory.
    #[instrument(skip(self, content, tags))]
    pub fn update(
        &mut self,
        id: &PromptId,
        title: &str,
        content: &str,
        tags: Vec<String>,
    ) -> Result<Prompt> {
        let index = self.position(id).inspect_err(|_| {
            warn!("update of unknown prompt");
        })?;
        let (title, content) = validate_fields(title, content).inspect_err(|e| {
            warn!("rejected prompt update: {e}");
        })?;

        let prompt = Prompt {
            id: id.clone(),
            title,
            content,
            tags,
        };
        self.prompts[index] = prompt.clone();
        info!("prompt updated");

        self.persist()?;
        Ok(prompt)
    }

    /// Removes a prompt and persists the remaining collection.
    ///
    /// # Errors
    ///
    /// - [`Error::NotFound`] if no prompt has `id` (nothing is changed).
    /// - [`Error::Persistence`] if the save fails; the removal stays in memory.
    #[instrument(skip(self))]
    pub fn delete(&mut self, id: &PromptId) -> Result<Prompt> {
        let index = self.position(id).inspect_err(|_| {
            warn!("delete of unknown prompt");
        })?;
        let removed = self.prompts.remove(index);
        info!("prompt deleted");

        self.persist()?;
        Ok(removed)
    }

    /// Creates or updates a prompt from form fields.
    ///
    /// A form without an id (or with a blank one) creates a new prompt.
    ///
    /// # Errors
    ///
    /// See [`create`](Self::create) and [`update`](Self::update).
    pub fn save_form(&mut self, form: &PromptForm) -> Result<Prompt> {
        let tags = form.parsed_tags();
        match form.id.as_ref().filter(|id| !id.as_str().trim().is_empty()) {
            Some(id) => self.update(id, &form.title, &form.content, tags),
            None => self.create(&form.title, &form.content, tags),
        }
    }

    fn persist(&self) -> Result<()> {
        self.adapter.save(&self.prompts).inspect_err(|e| {
            error!("failed to persist prompts: {e}");
        })
    }
}
