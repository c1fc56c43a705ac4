//! search-summary: web search with AI-generated summaries
//!
//! Runs a query against a search-with-contents provider, then asks a chat
//! completion provider to summarize the retrieved sources.

pub mod config;
pub mod metrics;
pub mod network;
pub mod providers;
pub mod results;
pub mod search;
pub mod web;

pub use config::Settings;
pub use providers::{CompletionProvider, SearchProvider};
pub use results::{SearchResult, SearchSummary};
pub use search::{SummaryOutcome, SummarySearch};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
