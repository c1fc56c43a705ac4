//! Search-then-summarize orchestration

use super::models::{OrchestrationError, SummaryOutcome, SummaryUnavailable};
use super::prompt::{combine_sources, summary_messages};
use crate::metrics::Metrics;
use crate::providers::{
    CompletionOptions, CompletionProvider, SearchOptions, SearchProvider, SearchType,
    TextContents,
};
use crate::results::SearchSummary;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Default number of results fed into a summary
pub const DEFAULT_RESULT_LIMIT: u32 = 5;

/// Default summarization temperature
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Runs a search and summarizes its results.
///
/// A failed search fails the whole outcome. A failed summary only degrades
/// it: the results are still returned.
pub struct SummarySearch {
    search: Arc<dyn SearchProvider>,
    completion: Arc<dyn CompletionProvider>,
    search_options: SearchOptions,
    completion_options: CompletionOptions,
    metrics: Arc<Metrics>,
}

impl SummarySearch {
    /// Create a new orchestrator with the default summary configuration
    pub fn new(search: Arc<dyn SearchProvider>, completion: Arc<dyn CompletionProvider>) -> Self {
        Self {
            search,
            completion,
            search_options: SearchOptions::new()
                .with_type(SearchType::Auto)
                .with_text(TextContents::Enabled)
                .with_limit(DEFAULT_RESULT_LIMIT),
            completion_options: CompletionOptions::new()
                .with_model(crate::providers::DEFAULT_MODEL)
                .with_temperature(DEFAULT_TEMPERATURE),
            metrics: Arc::new(Metrics::new()),
        }
    }

    /// Set the number of results fed into the summary
    pub fn with_result_limit(mut self, limit: u32) -> Self {
        self.search_options.limit = Some(limit);
        self
    }

    /// Set the completion options used for summaries
    pub fn with_completion_options(mut self, options: CompletionOptions) -> Self {
        self.completion_options = options;
        self
    }

    /// Share a metrics collector
    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.metrics
    }

    /// Search for `query` and summarize the results.
    ///
    /// Never panics: a fault inside the pipeline becomes a failed outcome with
    /// an empty payload.
    pub async fn execute(&self, query: &str) -> SummaryOutcome {
        self.metrics.inc_search();

        let outcome = match AssertUnwindSafe(self.run(query)).catch_unwind().await {
            Ok(outcome) => outcome,
            Err(_) => {
                error!("Error in search with summaries for '{}'", query);
                SummaryOutcome::failed(OrchestrationError::Unexpected)
            }
        };

        if !outcome.is_success() {
            self.metrics.inc_failed_search();
        } else if outcome.data.summary.is_none() {
            self.metrics.inc_summary_unavailable();
        }

        outcome
    }

    async fn run(&self, query: &str) -> SummaryOutcome {
        if query.trim().is_empty() {
            return SummaryOutcome::failed(OrchestrationError::EmptyQuery);
        }

        info!("Executing summarized search '{}'", query);

        let start = Instant::now();
        let search_result = self.search.search(query, &self.search_options).await;
        self.record_call(self.search.name(), start, search_result.is_ok());

        let mut results = match search_result {
            Ok(results) => results,
            Err(e) => {
                return SummaryOutcome::failed(OrchestrationError::Search {
                    message: self.search.failure_message().to_string(),
                    source: e,
                });
            }
        };

        if let Some(limit) = self.search_options.limit {
            results.truncate(limit as usize);
        }

        let combined = combine_sources(&results);
        debug!("Combined text length: {}", combined.len());

        let messages = summary_messages(&combined);

        let start = Instant::now();
        let completion = self
            .completion
            .complete(&messages, &self.completion_options)
            .await;
        self.record_call(self.completion.name(), start, completion.is_ok());

        match completion {
            Ok(completion) => match completion.message.content {
                Some(summary) if !summary.is_empty() => SummaryOutcome::complete(SearchSummary {
                    results,
                    summary: Some(summary),
                }),
                _ => {
                    warn!("Completion {} returned no content", completion.id);
                    SummaryOutcome::degraded(
                        SearchSummary {
                            results,
                            summary: None,
                        },
                        SummaryUnavailable::EmptyContent,
                    )
                }
            },
            Err(e) => {
                let message = self.completion.failure_message().to_string();
                error!("Failed to generate summary: {}", message);
                SummaryOutcome::degraded(
                    SearchSummary {
                        results,
                        summary: None,
                    },
                    SummaryUnavailable::Provider { message, source: e },
                )
            }
        }
    }

    fn record_call(&self, provider: &str, start: Instant, success: bool) {
        self.metrics
            .record_response_time(provider, start.elapsed().as_millis() as u64);
        if success {
            self.metrics.record_success(provider);
        } else {
            self.metrics.record_error(provider);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::ProviderError;
    use crate::results::{ChatMessage, CompletionResult, Role, SearchResult};
    use crate::search::{OutcomeStatus, SUCCESS_MESSAGE};
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use std::sync::Mutex;

    struct StubSearch {
        response: Result<Vec<SearchResult>, ProviderError>,
        calls: Mutex<Vec<(String, SearchOptions)>>,
    }

    impl StubSearch {
        fn new(response: Result<Vec<SearchResult>, ProviderError>) -> Arc<Self> {
            Arc::new(Self {
                response,
                calls: Mutex::new(Vec::new()),
            })
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl SearchProvider for StubSearch {
        fn name(&self) -> &str {
            "stub-search"
        }

        async fn search(
            &self,
            query: &str,
            options: &SearchOptions,
        ) -> Result<Vec<SearchResult>, ProviderError> {
            self.calls
                .lock()
                .unwrap()
                .push((query.to_string(), options.clone()));
            self.response.clone()
        }
    }

    struct StubCompletion {
        response: Result<Option<String>, ProviderError>,
        calls: Mutex<Vec<(Vec<ChatMessage>, CompletionOptions)>>,
    }

    impl StubCompletion {
        fn new(response: Result<Option<String>, ProviderError>) -> Arc<Self> {
            Arc::new(Self {
                response,
                calls: Mutex::new(Vec::new()),
            })
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }

        fn last_messages(&self) -> Vec<ChatMessage> {
            self.calls.lock().unwrap().last().unwrap().0.clone()
        }
    }

    #[async_trait]
    impl CompletionProvider for StubCompletion {
        fn name(&self) -> &str {
            "stub-completion"
        }

        async fn complete(
            &self,
            messages: &[ChatMessage],
            options: &CompletionOptions,
        ) -> Result<CompletionResult, ProviderError> {
            self.calls
                .lock()
                .unwrap()
                .push((messages.to_vec(), options.clone()));
            self.response.clone().map(|content| CompletionResult {
                id: "cmpl-1".to_string(),
                message: ChatMessage {
                    role: Role::Assistant,
                    content,
                    name: None,
                    function_call: None,
                },
                finish_reason: Some("stop".to_string()),
                created: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
            })
        }
    }

    struct PanickingSearch;

    #[async_trait]
    impl SearchProvider for PanickingSearch {
        fn name(&self) -> &str {
            "panicking"
        }

        async fn search(
            &self,
            _query: &str,
            _options: &SearchOptions,
        ) -> Result<Vec<SearchResult>, ProviderError> {
            panic!("provider bug");
        }
    }

    fn texts(texts: &[&str]) -> Vec<SearchResult> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| SearchResult::new(format!("https://{}.example", i)).with_text(*t))
            .collect()
    }

    #[tokio::test]
    async fn test_summary_success() {
        let search = StubSearch::new(Ok(texts(&["A", "B"])));
        let completion = StubCompletion::new(Ok(Some("X".to_string())));
        let orchestrator = SummarySearch::new(search.clone(), completion.clone());

        let outcome = orchestrator.execute("rust").await;

        assert_eq!(outcome.status, OutcomeStatus::Complete);
        assert!(outcome.is_success());
        assert_eq!(outcome.message(), SUCCESS_MESSAGE);
        assert_eq!(outcome.data.summary.as_deref(), Some("X"));
        assert_eq!(outcome.data.results, texts(&["A", "B"]));

        let messages = completion.last_messages();
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[1].role, Role::User);
        assert!(messages[1]
            .content
            .as_deref()
            .unwrap()
            .ends_with("\n\nSource 1:\nA\n\nSource 2:\nB"));
    }

    #[tokio::test]
    async fn test_fixed_provider_options() {
        let search = StubSearch::new(Ok(texts(&["A"])));
        let completion = StubCompletion::new(Ok(Some("X".to_string())));
        let orchestrator = SummarySearch::new(search.clone(), completion.clone());

        orchestrator.execute("rust").await;

        let (query, options) = search.calls.lock().unwrap()[0].clone();
        assert_eq!(query, "rust");
        assert_eq!(options.search_type, Some(SearchType::Auto));
        assert_eq!(options.text, Some(TextContents::Enabled));
        assert_eq!(options.limit, Some(5));

        let (_, options) = completion.calls.lock().unwrap()[0].clone();
        assert_eq!(options.model(), "gpt-4o-mini");
        assert_eq!(options.temperature, Some(0.7));
    }

    #[tokio::test]
    async fn test_results_capped_in_order() {
        let many = texts(&["1", "2", "3", "4", "5", "6", "7"]);
        let search = StubSearch::new(Ok(many.clone()));
        let completion = StubCompletion::new(Ok(Some("X".to_string())));
        let orchestrator = SummarySearch::new(search, completion.clone());

        let outcome = orchestrator.execute("q").await;

        assert_eq!(outcome.data.results.len(), 5);
        assert_eq!(outcome.data.results, many[..5].to_vec());
        let prompt = completion.last_messages()[1].content.clone().unwrap();
        assert!(prompt.contains("Source 5:\n5"));
        assert!(!prompt.contains("Source 6:"));
    }

    #[tokio::test]
    async fn test_fewer_results_than_cap() {
        let search = StubSearch::new(Ok(texts(&["only"])));
        let completion = StubCompletion::new(Ok(Some("X".to_string())));
        let outcome = SummarySearch::new(search, completion).execute("q").await;
        assert_eq!(outcome.data.results.len(), 1);
    }

    #[tokio::test]
    async fn test_search_failure_skips_completion() {
        let search = StubSearch::new(Err(ProviderError::Http {
            status: 500,
            body: "boom".to_string(),
        }));
        let completion = StubCompletion::new(Ok(Some("never".to_string())));
        let orchestrator = SummarySearch::new(search.clone(), completion.clone());

        let outcome = orchestrator.execute("q").await;

        assert!(!outcome.is_success());
        assert_eq!(outcome.message(), "Failed to perform search");
        assert!(outcome.data.results.is_empty());
        assert!(outcome.data.summary.is_none());
        assert_eq!(search.call_count(), 1);
        assert_eq!(completion.call_count(), 0);
        assert!(matches!(
            outcome.status,
            OutcomeStatus::Failed(OrchestrationError::Search {
                source: ProviderError::Http { status: 500, .. },
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_completion_failure_degrades() {
        let results = texts(&["A", "B"]);
        let search = StubSearch::new(Ok(results.clone()));
        let completion = StubCompletion::new(Err(ProviderError::Timeout));
        let orchestrator = SummarySearch::new(search, completion.clone());

        let outcome = orchestrator.execute("q").await;

        assert!(outcome.is_success());
        assert_eq!(outcome.message(), SUCCESS_MESSAGE);
        assert_eq!(outcome.data.results, results);
        assert!(outcome.data.summary.is_none());
        assert_eq!(completion.call_count(), 1);
        assert_eq!(
            outcome.summary_unavailable(),
            Some(&SummaryUnavailable::Provider {
                message: "Failed to get chat completion".to_string(),
                source: ProviderError::Timeout,
            })
        );
    }

    #[tokio::test]
    async fn test_empty_content_degrades() {
        let results = texts(&["A"]);
        let search = StubSearch::new(Ok(results.clone()));
        let completion = StubCompletion::new(Ok(None));

        let outcome = SummarySearch::new(search, completion).execute("q").await;

        assert!(outcome.is_success());
        assert_eq!(outcome.data.results, results);
        assert!(outcome.data.summary.is_none());
        assert_eq!(
            outcome.summary_unavailable(),
            Some(&SummaryUnavailable::EmptyContent)
        );
    }

    #[tokio::test]
    async fn test_empty_string_content_degrades() {
        let search = StubSearch::new(Ok(texts(&["A"])));
        let completion = StubCompletion::new(Ok(Some(String::new())));
        let metrics = Arc::new(Metrics::new());

        let outcome = SummarySearch::new(search, completion)
            .with_metrics(metrics.clone())
            .execute("q")
            .await;

        assert!(outcome.is_success());
        assert_eq!(outcome.data.results.len(), 1);
        assert!(outcome.data.summary.is_none());
        assert_eq!(
            outcome.summary_unavailable(),
            Some(&SummaryUnavailable::EmptyContent)
        );
        assert_eq!(metrics.snapshot().summaries_unavailable, 1);
    }

    #[tokio::test]
    async fn test_empty_search_still_summarizes() {
        let search = StubSearch::new(Ok(vec![]));
        let completion = StubCompletion::new(Ok(Some("nothing found".to_string())));
        let orchestrator = SummarySearch::new(search, completion.clone());

        let outcome = orchestrator.execute("q").await;

        assert!(outcome.is_success());
        assert!(outcome.data.results.is_empty());
        assert_eq!(completion.call_count(), 1);
    }

    #[tokio::test]
    async fn test_idempotent_outcomes() {
        let search = StubSearch::new(Ok(texts(&["A", "B"])));
        let completion = StubCompletion::new(Ok(Some("X".to_string())));
        let orchestrator = SummarySearch::new(search, completion);

        let first = orchestrator.execute("q").await;
        let second = orchestrator.execute("q").await;

        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[tokio::test]
    async fn test_blank_query_makes_no_calls() {
        let search = StubSearch::new(Ok(texts(&["A"])));
        let completion = StubCompletion::new(Ok(Some("X".to_string())));
        let orchestrator = SummarySearch::new(search.clone(), completion.clone());

        let outcome = orchestrator.execute("   ").await;

        assert_eq!(
            outcome.status,
            OutcomeStatus::Failed(OrchestrationError::EmptyQuery)
        );
        assert!(outcome.data.results.is_empty());
        assert_eq!(search.call_count(), 0);
        assert_eq!(completion.call_count(), 0);
    }

    #[tokio::test]
    async fn test_panic_becomes_failure() {
        let completion = StubCompletion::new(Ok(Some("X".to_string())));
        let orchestrator = SummarySearch::new(Arc::new(PanickingSearch), completion.clone());

        let outcome = orchestrator.execute("q").await;

        assert_eq!(
            outcome.status,
            OutcomeStatus::Failed(OrchestrationError::Unexpected)
        );
        assert_eq!(outcome.message(), "Failed to perform search with summaries");
        assert!(outcome.data.results.is_empty());
        assert!(outcome.data.summary.is_none());
        assert_eq!(completion.call_count(), 0);
    }

    #[tokio::test]
    async fn test_metrics_recorded() {
        let search = StubSearch::new(Ok(texts(&["A"])));
        let completion = StubCompletion::new(Err(ProviderError::NoChoices));
        let metrics = Arc::new(Metrics::new());
        let orchestrator =
            SummarySearch::new(search, completion).with_metrics(metrics.clone());

        orchestrator.execute("q").await;

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.total_searches, 1);
        assert_eq!(snapshot.failed_searches, 0);
        assert_eq!(snapshot.summaries_unavailable, 1);
        assert_eq!(metrics.get_reliability("stub-search"), 100.0);
        assert_eq!(metrics.get_reliability("stub-completion"), 0.0);
    }

    #[tokio::test]
    async fn test_custom_limit_and_options() {
        let search = StubSearch::new(Ok(texts(&["1", "2", "3"])));
        let completion = StubCompletion::new(Ok(Some("X".to_string())));
        let orchestrator = SummarySearch::new(search, completion.clone())
            .with_result_limit(2)
            .with_completion_options(CompletionOptions::new().with_model("gpt-4o"));

        let outcome = orchestrator.execute("q").await;

        assert_eq!(outcome.data.results.len(), 2);
        let (_, options) = completion.calls.lock().unwrap()[0].clone();
        assert_eq!(options.model(), "gpt-4o");
        assert!(options.temperature.is_none());
    }
}
