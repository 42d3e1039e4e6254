//! Application configuration
//!
//! Loaded from a YAML file. Every field has a default, so an empty document
//! (or no file at all) yields a working ESI configuration.

use crate::error::{Error, Result, ResultExt};
use crate::http::{HttpClient, HttpClientConfig};
use crate::pagination::{FetchConfig, GateScope};
use crate::types::{DEFAULT_CONCURRENCY, DEFAULT_MAX_PAGES, DEFAULT_PAGE_COUNT_HEADER};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Public ESI endpoint
pub const DEFAULT_ESI_URL: &str = "https://esi.evetech.net/latest";

/// zKillboard API root
pub const DEFAULT_ZKILLBOARD_URL: &str = "https://zkillboard.com/api";

/// Janice appraisal endpoint
pub const DEFAULT_JANICE_URL: &str = "https://janice.e-351.com/api/rest/v2";

/// User agent sent when none is configured
pub const DEFAULT_USER_AGENT: &str = concat!("corp-esi/", env!("CARGO_PKG_VERSION"));

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// ESI endpoint settings
    #[serde(default)]
    pub esi: EsiConfig,

    /// Janice endpoint settings
    #[serde(default)]
    pub janice: JaniceConfig,

    /// Shared HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Paginated fetch settings
    #[serde(default)]
    pub pagination: PaginationConfig,
}

/// ESI endpoint settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EsiConfig {
    /// Base URL
    #[serde(default = "default_esi_url")]
    pub base_url: String,

    /// `datasource` query parameter for public calls
    #[serde(default = "default_datasource")]
    pub datasource: String,

    /// zKillboard API root, used to look up killmail hashes
    #[serde(default = "default_zkillboard_url")]
    pub zkillboard_url: String,
}

impl Default for EsiConfig {
    fn default() -> Self {
        Self {
            base_url: default_esi_url(),
            datasource: default_datasource(),
            zkillboard_url: default_zkillboard_url(),
        }
    }
}

/// Janice endpoint settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JaniceConfig {
    /// Base URL
    #[serde(default = "default_janice_url")]
    pub base_url: String,
}

impl Default for JaniceConfig {
    fn default() -> Self {
        Self {
            base_url: default_janice_url(),
        }
    }
}

/// HTTP client settings shared by every endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// User agent string
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Idle pooled connection lifetime in seconds
    #[serde(default = "default_pool_idle_timeout_secs")]
    pub pool_idle_timeout_secs: u64,

    /// Maximum idle pooled connections per host
    #[serde(default = "default_pool_max_idle_per_host")]
    pub pool_max_idle_per_host: usize,

    /// Optional HTTP proxy
    #[serde(default)]
    pub proxy: Option<ProxyConfig>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            pool_idle_timeout_secs: default_pool_idle_timeout_secs(),
            pool_max_idle_per_host: default_pool_max_idle_per_host(),
            proxy: None,
        }
    }
}

/// HTTP proxy address
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyConfig {
    /// Proxy host
    #[serde(default)]
    pub host: String,
    /// Proxy port (string, as in most deployment files)
    #[serde(default)]
    pub port: String,
}

impl ProxyConfig {
    /// Proxy URL, or `None` when host or port is blank
    pub fn url(&self) -> Option<String> {
        let host = self.host.trim();
        let port = self.port.trim();
        if host.is_empty() || port.is_empty() {
            return None;
        }
        Some(format!("http://{host}:{port}"))
    }
}

/// Paginated fetch settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Maximum simultaneous in-flight page requests
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Per-call or shared concurrency gate
    #[serde(default)]
    pub gate: GateScope,

    /// Skip not-yet-started pages once one has failed
    #[serde(default)]
    pub fail_fast: bool,

    /// Response header carrying the total page count
    #[serde(default = "default_page_count_header")]
    pub page_count_header: String,

    /// Largest page count a server may announce
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            gate: GateScope::default(),
            fail_fast: false,
            page_count_header: default_page_count_header(),
            max_pages: default_max_pages(),
        }
    }
}

fn default_esi_url() -> String {
    DEFAULT_ESI_URL.to_string()
}

fn default_datasource() -> String {
    "tranquility".to_string()
}

fn default_zkillboard_url() -> String {
    DEFAULT_ZKILLBOARD_URL.to_string()
}

fn default_janice_url() -> String {
    DEFAULT_JANICE_URL.to_string()
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_pool_idle_timeout_secs() -> u64 {
    90
}

fn default_pool_max_idle_per_host() -> usize {
    2000
}

fn default_concurrency() -> usize {
    DEFAULT_CONCURRENCY
}

fn default_page_count_header() -> String {
    DEFAULT_PAGE_COUNT_HEADER.to_string()
}

fn default_max_pages() -> u32 {
    DEFAULT_MAX_PAGES
}

// ============================================================================
// Loading
// ============================================================================

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .context(format!("Failed to read config file '{}'", path.display()))?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // serde_yaml rejects an empty document for a struct
        let config: AppConfig = if yaml.trim().is_empty() {
            AppConfig::default()
        } else {
            serde_yaml::from_str(yaml)?
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate field values
    pub fn validate(&self) -> Result<()> {
        if self.esi.base_url.trim().is_empty() {
            return Err(Error::invalid_config("esi.base_url", "cannot be empty"));
        }
        url::Url::parse(&self.esi.base_url)?;

        if self.janice.base_url.trim().is_empty() {
            return Err(Error::invalid_config("janice.base_url", "cannot be empty"));
        }
        url::Url::parse(&self.janice.base_url)?;

        if self.http.timeout_secs == 0 {
            return Err(Error::invalid_config(
                "http.timeout_secs",
                "must be greater than zero",
            ));
        }

        if self.pagination.concurrency == 0 {
            return Err(Error::invalid_config(
                "pagination.concurrency",
                "must be greater than zero",
            ));
        }

        if self.pagination.page_count_header.trim().is_empty() {
            return Err(Error::invalid_config(
                "pagination.page_count_header",
                "cannot be empty",
            ));
        }

        if self.pagination.max_pages == 0 {
            return Err(Error::invalid_config(
                "pagination.max_pages",
                "must be greater than zero",
            ));
        }

        Ok(())
    }

    /// HTTP client settings for a given base URL
    pub fn http_client_config(&self, base_url: &str) -> HttpClientConfig {
        let mut builder = HttpClientConfig::builder()
            .base_url(base_url)
            .timeout(Duration::from_secs(self.http.timeout_secs))
            .pool(
                Duration::from_secs(self.http.pool_idle_timeout_secs),
                self.http.pool_max_idle_per_host,
            )
            .user_agent(&self.http.user_agent)
            .page_count_header(&self.pagination.page_count_header);

        if let Some(proxy) = self.http.proxy.as_ref().and_then(ProxyConfig::url) {
            builder = builder.proxy(proxy);
        }

        builder.build()
    }

    /// Build the ESI HTTP client
    pub fn esi_http_client(&self) -> Result<HttpClient> {
        HttpClient::with_config(self.http_client_config(&self.esi.base_url))
    }

    /// Build the Janice HTTP client
    pub fn janice_http_client(&self) -> Result<HttpClient> {
        HttpClient::with_config(self.http_client_config(&self.janice.base_url))
    }

    /// Orchestrator settings
    pub fn fetch_config(&self) -> FetchConfig {
        FetchConfig::default()
            .concurrency(self.pagination.concurrency)
            .gate_scope(self.pagination.gate)
            .fail_fast(self.pagination.fail_fast)
            .page_count_header(&self.pagination.page_count_header)
            .max_pages(self.pagination.max_pages)
    }
}
