//! Result type definitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

/// A single search result with its inline content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    /// Provider-assigned identifier
    pub id: Option<String>,
    /// The URL of the result
    pub url: String,
    /// The title of the result
    pub title: Option<String>,
    /// Author name
    pub author: Option<String>,
    /// Published date as reported by the provider
    pub published_date: Option<String>,
    /// Extracted page content
    pub text: Option<String>,
    /// Relevance score
    pub score: Option<f64>,
}

impl SearchResult {
    /// Create a new result with only a URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            id: None,
            url: url.into(),
            title: None,
            author: None,
            published_date: None,
            text: None,
            score: None,
        }
    }

    /// Add a title to the result
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Add content to the result
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Add an author to the result
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Add a published date to the result
    pub fn with_published_date(mut self, date: impl Into<String>) -> Self {
        self.published_date = Some(date.into());
        self
    }

    /// Get the hostname from the URL
    pub fn hostname(&self) -> Option<String> {
        Url::parse(&self.url)
            .ok()
            .and_then(|u| u.host_str().map(|h| h.to_string()))
    }

    /// Published date formatted for display, if it parses
    pub fn published_day(&self) -> Option<String> {
        let raw = self.published_date.as_deref()?;
        DateTime::parse_from_rfc3339(raw)
            .map(|d| d.format("%Y-%m-%d").to_string())
            .ok()
            .or_else(|| raw.get(..10).map(|s| s.to_string()))
    }
}

/// Author of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Function,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::Function => "function",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A function invocation requested by the model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    pub arguments: String,
}

/// A chat message, used for both requests and responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_call: Option<FunctionCall>,
}

impl ChatMessage {
    /// Create a message with text content
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: Some(content.into()),
            name: None,
            function_call: None,
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// A normalized chat completion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionResult {
    /// Completion identifier
    pub id: String,
    /// First returned choice
    pub message: ChatMessage,
    /// Why generation stopped
    pub finish_reason: Option<String>,
    /// Creation time reported by the provider
    pub created: DateTime<Utc>,
}

/// Search results together with their summary
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchSummary {
    /// Search results in provider order
    pub results: Vec<SearchResult>,
    /// AI-generated summary, absent when summarization did not produce one
    pub summary: Option<String>,
}

impl SearchSummary {
    /// Payload returned alongside a failed search
    pub fn empty() -> Self {
        Self::default()
    }

    /// Summary split into paragraphs for rendering
    pub fn summary_paragraphs(&self) -> Vec<String> {
        self.summary
            .as_deref()
            .map(|s| {
                s.split("\n\n")
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_builder() {
        let result = SearchResult::new("https://example.com/post")
            .with_title("Example")
            .with_text("body");

        assert_eq!(result.title.as_deref(), Some("Example"));
        assert_eq!(result.text.as_deref(), Some("body"));
        assert!(result.author.is_none());
        assert_eq!(result.hostname().as_deref(), Some("example.com"));
    }

    #[test]
    fn test_published_day() {
        let result =
            SearchResult::new("https://example.com").with_published_date("2024-03-05T10:00:00.000Z");
        assert_eq!(result.published_day().as_deref(), Some("2024-03-05"));

        let plain = SearchResult::new("https://example.com").with_published_date("2023-12-01");
        assert_eq!(plain.published_day().as_deref(), Some("2023-12-01"));

        assert!(SearchResult::new("https://example.com").published_day().is_none());
    }

    #[test]
    fn test_role_serialization() {
        let json = serde_json::to_string(&ChatMessage::system("hi")).unwrap();
        assert_eq!(json, r#"{"role":"system","content":"hi"}"#);

        let parsed: Role = serde_json::from_str("\"function\"").unwrap();
        assert_eq!(parsed, Role::Function);
        assert!(serde_json::from_str::<Role>("\"tool\"").is_err());
    }

    #[test]
    fn test_summary_paragraphs() {
        let summary = SearchSummary {
            results: vec![],
            summary: Some("First.\n\n\n\nSecond line\ncontinued.\n\n".to_string()),
        };
        assert_eq!(
            summary.summary_paragraphs(),
            vec!["First.".to_string(), "Second line\ncontinued.".to_string()]
        );
        assert!(SearchSummary::empty().summary_paragraphs().is_empty());
    }
}
