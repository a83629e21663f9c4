//! Data models for promptshelf.
//!
//! This module contains the core data structures for saved prompts and the
//! form fields used to create or edit them.

mod prompt;

pub use prompt::{Prompt, PromptForm, PromptId, TAG_SEPARATOR, fold, parse_tags, validate_fields};
