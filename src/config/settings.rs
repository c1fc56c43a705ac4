//! Settings structures for search-summary configuration

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main settings structure matching `settings.yml`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub server: ServerSettings,
    pub outgoing: OutgoingSettings,
    pub exa: ProviderSettings,
    pub openai: ProviderSettings,
    pub summary: SummarySettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            general: GeneralSettings::default(),
            server: ServerSettings::default(),
            outgoing: OutgoingSettings::default(),
            exa: ProviderSettings::with_base_url(DEFAULT_EXA_BASE_URL),
            openai: ProviderSettings::with_base_url(DEFAULT_OPENAI_BASE_URL),
            summary: SummarySettings::default(),
        }
    }
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse settings from a YAML string
    pub fn from_yaml(content: &str) -> Result<Self> {
        let mut settings: Settings = serde_yaml::from_str(content)?;
        settings.fill_provider_defaults();
        Ok(settings)
    }

    /// Merge with environment variables
    pub fn merge_env(&mut self) {
        self.merge_from(|key| std::env::var(key).ok());
    }

    /// Merge values from an arbitrary variable source.
    ///
    /// Split out from [`Settings::merge_env`] so lookups can be exercised
    /// without touching the process environment.
    pub fn merge_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("EXA_API_KEY").filter(|v| !v.is_empty()) {
            self.exa.api_key = Some(val);
        }
        if let Some(val) = lookup("OPENAI_API_KEY").filter(|v| !v.is_empty()) {
            self.openai.api_key = Some(val);
        }
        if let Some(val) = lookup("SEARCH_SUMMARY_DEBUG") {
            self.general.debug = val.parse().unwrap_or(false);
        }
        if let Some(val) = lookup("SEARCH_SUMMARY_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Some(val) = lookup("SEARCH_SUMMARY_BIND_ADDRESS") {
            self.server.bind_address = val;
        }
        if let Some(val) = lookup("SEARCH_SUMMARY_EXA_BASE_URL") {
            self.exa.base_url = val;
        }
        if let Some(val) = lookup("SEARCH_SUMMARY_OPENAI_BASE_URL") {
            self.openai.base_url = val;
        }
        if let Some(val) = lookup("SEARCH_SUMMARY_MODEL") {
            self.summary.model = val;
        }
    }

    /// A provider section given without `base_url` falls back to the
    /// provider's public endpoint.
    fn fill_provider_defaults(&mut self) {
        if self.exa.base_url.is_empty() {
            self.exa.base_url = DEFAULT_EXA_BASE_URL.to_string();
        }
        if self.openai.base_url.is_empty() {
            self.openai.base_url = DEFAULT_OPENAI_BASE_URL.to_string();
        }
    }
}

/// Public Exa API endpoint
pub const DEFAULT_EXA_BASE_URL: &str = "https://api.exa.ai";

/// Public OpenAI API endpoint
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// General settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Enable debug logging
    pub debug: bool,
    /// Instance name displayed in UI
    pub instance_name: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            debug: false,
            instance_name: "AI-Powered Search".to_string(),
        }
    }
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Server port
    pub port: u16,
    /// Bind address
    pub bind_address: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: 3000,
            bind_address: "127.0.0.1".to_string(),
        }
    }
}

/// Outgoing request settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutgoingSettings {
    /// Request timeout in seconds
    pub request_timeout: f64,
    /// Verify SSL certificates
    pub verify_ssl: bool,
    /// User agent sent to providers (none = crate name and version)
    pub useragent: Option<String>,
    /// Proxy settings
    pub proxies: ProxySettings,
}

impl Default for OutgoingSettings {
    fn default() -> Self {
        Self {
            request_timeout: 60.0,
            verify_ssl: true,
            useragent: None,
            proxies: ProxySettings::default(),
        }
    }
}

/// Proxy settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxySettings {
    pub http: Option<String>,
    pub https: Option<String>,
    pub all: Option<String>,
}

/// Endpoint and credentials for one upstream provider
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    /// API base URL
    pub base_url: String,
    /// API key; usually supplied through the environment
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
}

impl ProviderSettings {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
        }
    }
}

/// Summarization settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarySettings {
    /// Completion model used for summaries
    pub model: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Maximum number of search results fed into the summary
    pub result_limit: u32,
}

impl Default for SummarySettings {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            temperature: 0.7,
            result_limit: 5,
        }
    }
}
