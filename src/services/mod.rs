//! Business logic services.
//!
//! The [`PromptStore`] owns the collection and persists every mutation.
//! [`search`] and the autocomplete functions are pure views over that
//! collection, and [`Session`] ties them together behind explicit intents.

mod autocomplete;
mod prompt_store;
mod search;
mod session;

pub use autocomplete::{Autocomplete, CursorState, Direction, available_tags, suggest};
pub use prompt_store::{LoadReport, PromptStore};
pub use search::{SearchQuery, TAG_SIGIL, is_tag_query, search};
pub use session::{Intent, Notice, NoticeLevel, Outcome, Session, SessionView};
