//! Exa search provider
//!
//! Uses Exa's search endpoint with inline contents, so page text arrives with
//! the results instead of through a separate fetch.

use super::traits::*;
use super::endpoint;
use crate::config::ProviderSettings;
use crate::network::HttpClient;
use crate::results::SearchResult;
use anyhow::Result as AnyhowResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};
use url::Url;

/// Exa search-with-contents adapter
pub struct ExaSearch {
    client: HttpClient,
    endpoint: Url,
    api_key: Option<String>,
}

impl ExaSearch {
    pub fn new(client: HttpClient, settings: &ProviderSettings) -> AnyhowResult<Self> {
        Ok(Self {
            client,
            endpoint: endpoint(&settings.base_url, "search")?,
            api_key: settings.api_key.clone(),
        })
    }

    async fn try_search(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<Vec<SearchResult>, ProviderError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ProviderError::MissingApiKey("Exa"))?;

        let request = ExaSearchRequest {
            query,
            search_type: options.search_type,
            num_results: options.limit,
            offset: options.offset,
            contents: options.text.as_ref().map(|text| ExaContents { text }),
        };

        let response = self
            .client
            .post_json(
                self.endpoint.clone(),
                &[("x-api-key", api_key.to_string())],
                &request,
            )
            .await?;

        if !response.is_success() {
            return Err(ProviderError::Http {
                status: response.status,
                body: response.text,
            });
        }

        let parsed: ExaSearchResponse = response.json()?;
        let results: Vec<SearchResult> = parsed
            .results
            .unwrap_or_default()
            .into_iter()
            .filter_map(ExaResult::into_search_result)
            .collect();

        debug!("Exa returned {} results for '{}'", results.len(), query);
        Ok(results)
    }
}

#[async_trait]
impl SearchProvider for ExaSearch {
    fn name(&self) -> &str {
        "exa"
    }

    async fn search(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<Vec<SearchResult>, ProviderError> {
        match self.try_search(query, options).await {
            Ok(results) => Ok(results),
            Err(e) => {
                error!("Error performing Exa search: {}", e);
                Err(e)
            }
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExaSearchRequest<'a> {
    query: &'a str,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    search_type: Option<SearchType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_results: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    offset: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    contents: Option<ExaContents<'a>>,
}

#[derive(Serialize)]
struct ExaContents<'a> {
    text: &'a TextContents,
}

#[derive(Deserialize)]
struct ExaSearchResponse {
    #[serde(default)]
    results: Option<Vec<ExaResult>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExaResult {
    id: Option<String>,
    url: Option<String>,
    title: Option<String>,
    author: Option<String>,
    published_date: Option<String>,
    text: Option<String>,
    score: Option<f64>,
}

impl ExaResult {
    fn into_search_result(self) -> Option<SearchResult> {
        let url = match self.url {
            Some(url) => url,
            None => {
                warn!("Dropping Exa result without a URL (id: {:?})", self.id);
                return None;
            }
        };

        Some(SearchResult {
            id: self.id,
            url,
            title: self.title,
            author: self.author,
            published_date: self.published_date,
            text: self.text,
            score: self.score,
        })
    }
}
