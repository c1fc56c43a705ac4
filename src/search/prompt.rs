//! Summarization prompt construction

use crate::results::{ChatMessage, SearchResult};

/// System instruction for the summarization model
pub const SYSTEM_PROMPT: &str = "You are a helpful assistant that creates comprehensive summaries. \
Analyze multiple sources and create a coherent summary that captures the key information and \
insights from all sources. Structure your response in clear paragraphs.";

/// Prefix of the user message, followed by the combined sources
pub const USER_PROMPT_PREFIX: &str =
    "Please provide a comprehensive summary of the following texts from multiple sources:\n\n";

/// Combine result texts into labeled, 1-indexed source blocks.
///
/// A result without text keeps its slot with empty content so indices always
/// match result positions.
pub fn combine_sources(results: &[SearchResult]) -> String {
    results
        .iter()
        .enumerate()
        .map(|(index, result)| {
            format!(
                "Source {}:\n{}",
                index + 1,
                result.text.as_deref().unwrap_or_default()
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Build the two-message summarization conversation
pub fn summary_messages(combined: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(SYSTEM_PROMPT),
        ChatMessage::user(format!("{}{}", USER_PROMPT_PREFIX, combined)),
    ]
}
