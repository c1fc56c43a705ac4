//! Application state shared across handlers

use crate::config::Settings;
use crate::search::SummarySearch;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Global settings
    pub settings: Arc<Settings>,
    /// Summarized search orchestrator
    pub search: Arc<SummarySearch>,
    /// Template renderer
    pub templates: Arc<super::Templates>,
}

impl AppState {
    /// Create new application state
    pub fn new(settings: Settings, search: SummarySearch) -> anyhow::Result<Self> {
        Ok(Self {
            settings: Arc::new(settings),
            search: Arc::new(search),
            templates: Arc::new(super::Templates::new()?),
        })
    }

    /// Get instance name
    pub fn instance_name(&self) -> &str {
        &self.settings.general.instance_name
    }
}
