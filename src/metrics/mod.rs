//! Metrics collection module
//!
//! Tracks provider latency, error rates and summary outcomes.

use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

/// Number of response times kept per provider
const RESPONSE_TIME_WINDOW: usize = 100;

/// Process-wide metrics collector
pub struct Metrics {
    /// Total orchestrated searches
    total_searches: AtomicU64,
    /// Searches that failed outright
    failed_searches: AtomicU64,
    /// Searches that returned without a summary
    summaries_unavailable: AtomicU64,
    /// Provider response times (rolling window in ms)
    response_times: RwLock<HashMap<String, Vec<u64>>>,
    /// Provider error counts
    errors: RwLock<HashMap<String, u64>>,
    /// Provider success counts
    successes: RwLock<HashMap<String, u64>>,
}

impl Metrics {
    /// Create a new metrics instance
    pub fn new() -> Self {
        Self {
            total_searches: AtomicU64::new(0),
            failed_searches: AtomicU64::new(0),
            summaries_unavailable: AtomicU64::new(0),
            response_times: RwLock::new(HashMap::new()),
            errors: RwLock::new(HashMap::new()),
            successes: RwLock::new(HashMap::new()),
        }
    }

    pub fn inc_search(&self) {
        self.total_searches.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_failed_search(&self) {
        self.failed_searches.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_summary_unavailable(&self) {
        self.summaries_unavailable.fetch_add(1, Ordering::Relaxed);
    }

    /// Record provider response time
    pub fn record_response_time(&self, provider: &str, time_ms: u64) {
        let mut times = self.response_times.write().unwrap();
        let entry = times.entry(provider.to_string()).or_default();

        if entry.len() >= RESPONSE_TIME_WINDOW {
            entry.remove(0);
        }
        entry.push(time_ms);
    }

    /// Record provider error
    pub fn record_error(&self, provider: &str) {
        let mut errors = self.errors.write().unwrap();
        *errors.entry(provider.to_string()).or_insert(0) += 1;
    }

    /// Record provider success
    pub fn record_success(&self, provider: &str) {
        let mut successes = self.successes.write().unwrap();
        *successes.entry(provider.to_string()).or_insert(0) += 1;
    }

    pub fn get_total_searches(&self) -> u64 {
        self.total_searches.load(Ordering::Relaxed)
    }

    /// Get average response time for a provider
    pub fn get_avg_response_time(&self, provider: &str) -> Option<u64> {
        let times = self.response_times.read().unwrap();
        times.get(provider).and_then(|t| {
            if t.is_empty() {
                None
            } else {
                Some(t.iter().sum::<u64>() / t.len() as u64)
            }
        })
    }

    /// Get reliability percentage for a provider
    pub fn get_reliability(&self, provider: &str) -> f64 {
        let errors = self.errors.read().unwrap();
        let successes = self.successes.read().unwrap();

        let error_count = *errors.get(provider).unwrap_or(&0);
        let success_count = *successes.get(provider).unwrap_or(&0);

        let total = error_count + success_count;
        if total == 0 {
            100.0
        } else {
            (success_count as f64 / total as f64) * 100.0
        }
    }

    /// Snapshot of all counters
    pub fn snapshot(&self) -> MetricsSnapshot {
        let mut providers: Vec<String> = self.successes.read().unwrap().keys().cloned().collect();
        for name in self.errors.read().unwrap().keys() {
            if !providers.contains(name) {
                providers.push(name.clone());
            }
        }
        providers.sort();

        let providers = providers
            .into_iter()
            .map(|name| {
                let calls = self.successes.read().unwrap().get(&name).copied().unwrap_or(0)
                    + self.errors.read().unwrap().get(&name).copied().unwrap_or(0);
                let stats = ProviderStats {
                    calls,
                    avg_response_time: self.get_avg_response_time(&name),
                    reliability: self.get_reliability(&name),
                };
                (name, stats)
            })
            .collect();

        MetricsSnapshot {
            total_searches: self.get_total_searches(),
            failed_searches: self.failed_searches.load(Ordering::Relaxed),
            summaries_unavailable: self.summaries_unavailable.load(Ordering::Relaxed),
            providers,
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Statistics for a single provider
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderStats {
    pub calls: u64,
    pub avg_response_time: Option<u64>,
    pub reliability: f64,
}

/// Point-in-time view of the collector
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub total_searches: u64,
    pub failed_searches: u64,
    pub summaries_unavailable: u64,
    pub providers: HashMap<String, ProviderStats>,
}
