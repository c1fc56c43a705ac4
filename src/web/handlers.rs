//! HTTP request handlers

use super::state::AppState;
use crate::results::SearchResult;
use crate::search::SummaryOutcome;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tera::Context;

/// Shown above the results when the summary could not be produced
pub const SUMMARY_UNAVAILABLE_MESSAGE: &str = "Failed to generate summary. Please try again.";

/// Query parameters for search
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    /// Search query
    pub q: Option<String>,
    /// Output format
    pub format: Option<String>,
}

/// A search result prepared for the result card template
#[derive(Debug, Serialize)]
pub struct ResultView {
    pub url: String,
    pub title: String,
    pub hostname: Option<String>,
    pub author: Option<String>,
    pub published: Option<String>,
    pub score: Option<String>,
}

impl From<&SearchResult> for ResultView {
    fn from(result: &SearchResult) -> Self {
        Self {
            url: result.url.clone(),
            title: result.title.clone().unwrap_or_else(|| result.url.clone()),
            hostname: result.hostname(),
            author: result.author.clone().filter(|a| !a.is_empty()),
            published: result.published_day(),
            score: result.score.map(|s| format!("{:.2}", s)),
        }
    }
}

/// Banner text for an outcome, if any
pub fn banner(outcome: &SummaryOutcome) -> Option<String> {
    if !outcome.is_success() {
        Some(outcome.message())
    } else if outcome.data.summary.is_none() {
        Some(SUMMARY_UNAVAILABLE_MESSAGE.to_string())
    } else {
        None
    }
}

/// Home page handler
pub async fn index(State(state): State<AppState>) -> Response {
    let mut ctx = Context::new();
    ctx.insert("instance_name", state.instance_name());

    match state.templates.render_with_context("index.html", &ctx) {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!("Template error: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Template error").into_response()
        }
    }
}

/// Search handler
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Response {
    let query = match params.q {
        Some(q) if !q.trim().is_empty() => q,
        _ => return Redirect::to("/").into_response(),
    };

    let outcome = state.search.execute(&query).await;

    match params.format.as_deref() {
        Some("json") => Json(outcome).into_response(),
        _ => {
            let results: Vec<ResultView> =
                outcome.data.results.iter().map(ResultView::from).collect();

            let mut ctx = Context::new();
            ctx.insert("instance_name", state.instance_name());
            ctx.insert("query", &query);
            ctx.insert("results", &results);
            ctx.insert("summary_paragraphs", &outcome.data.summary_paragraphs());
            ctx.insert("error", &banner(&outcome));

            match state.templates.render_with_context("search.html", &ctx) {
                Ok(html) => Html(html).into_response(),
                Err(e) => {
                    tracing::error!("Template error: {}", e);
                    (StatusCode::INTERNAL_SERVER_ERROR, "Template error").into_response()
                }
            }
        }
    }
}

/// Stats handler
pub async fn stats(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.search.metrics().snapshot())
}

/// Health check handler
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": crate::VERSION
    }))
}
