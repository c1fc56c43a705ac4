//! Outcome types for a summarized search

use crate::providers::ProviderError;
use crate::results::SearchSummary;
use serde::{Serialize, Serializer};

/// Message reported when search and summary both succeed, or when only the
/// summary is missing
pub const SUCCESS_MESSAGE: &str = "Search and summary completed successfully";

/// Why an orchestration produced nothing to show
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OrchestrationError {
    #[error("Please enter a search query")]
    EmptyQuery,

    /// The search step failed; `message` is the provider's generic message
    #[error("{message}")]
    Search {
        message: String,
        #[source]
        source: ProviderError,
    },

    #[error("Failed to perform search with summaries")]
    Unexpected,
}

/// Why a successful search came back without a summary
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SummaryUnavailable {
    #[error("{message}")]
    Provider {
        message: String,
        #[source]
        source: ProviderError,
    },

    #[error("Completion returned no content")]
    EmptyContent,
}

/// Overall state of a summarized search
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutcomeStatus {
    /// Results and summary are both present
    Complete,
    /// Results are present, the summary is not
    Degraded(SummaryUnavailable),
    /// Nothing to show
    Failed(OrchestrationError),
}

/// Result of a summarized search.
///
/// `data` is always well-formed: a failed outcome carries an empty payload
/// rather than none at all.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryOutcome {
    pub status: OutcomeStatus,
    pub data: SearchSummary,
}

impl SummaryOutcome {
    pub fn complete(data: SearchSummary) -> Self {
        Self {
            status: OutcomeStatus::Complete,
            data,
        }
    }

    pub fn degraded(data: SearchSummary, reason: SummaryUnavailable) -> Self {
        Self {
            status: OutcomeStatus::Degraded(reason),
            data,
        }
    }

    pub fn failed(error: OrchestrationError) -> Self {
        Self {
            status: OutcomeStatus::Failed(error),
            data: SearchSummary::empty(),
        }
    }

    /// Whether there are results to show
    pub fn is_success(&self) -> bool {
        !matches!(self.status, OutcomeStatus::Failed(_))
    }

    /// User-facing message for this outcome
    pub fn message(&self) -> String {
        match &self.status {
            OutcomeStatus::Failed(e) => e.to_string(),
            _ => SUCCESS_MESSAGE.to_string(),
        }
    }

    /// Reason the summary is missing from an otherwise successful outcome
    pub fn summary_unavailable(&self) -> Option<&SummaryUnavailable> {
        match &self.status {
            OutcomeStatus::Degraded(reason) => Some(reason),
            _ => None,
        }
    }
}

/// Wire form: `{ "is_success", "message", "data" }`
impl Serialize for SummaryOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Wire<'a> {
            is_success: bool,
            message: String,
            data: &'a SearchSummary,
        }

        Wire {
            is_success: self.is_success(),
            message: self.message(),
            data: &self.data,
        }
        .serialize(serializer)
    }
}
