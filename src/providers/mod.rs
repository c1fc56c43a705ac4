//! Upstream provider module
//!
//! Defines the provider traits and the adapters for the search and
//! completion services.

mod traits;

pub mod exa;
pub mod openai;

pub use exa::ExaSearch;
pub use openai::OpenAiChat;
pub use traits::*;

use anyhow::Result;
use url::Url;

/// Resolve `path` below a provider base URL, keeping any base path segment
fn endpoint(base_url: &str, path: &str) -> Result<Url> {
    let base = format!("{}/", base_url.trim_end_matches('/'));
    Ok(Url::parse(&base)?.join(path)?)
}
