//! Search orchestration module
//!
//! Runs a search, builds a summarization prompt from its results and asks the
//! completion provider for a summary.

mod executor;
mod models;
mod prompt;

pub use executor::{SummarySearch, DEFAULT_RESULT_LIMIT, DEFAULT_TEMPERATURE};
pub use models::*;
pub use prompt::{combine_sources, summary_messages, SYSTEM_PROMPT, USER_PROMPT_PREFIX};
