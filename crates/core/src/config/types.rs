use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub time_source: TimeSourceConfig,
    #[serde(default)]
    pub filter: FilterConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    7000
}

/// Upstream torrent catalog (Debrid Media Manager) configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogConfig {
    /// Catalog base URL (e.g., "https://debridmediamanager.com")
    #[serde(default = "default_catalog_url")]
    pub base_url: String,
    /// Per-page request timeout in seconds (default: 20)
    #[serde(default = "default_catalog_timeout")]
    pub timeout_secs: u32,
    /// Hard cap on pages fetched for a single request (default: 50)
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: default_catalog_url(),
            timeout_secs: default_catalog_timeout(),
            max_pages: default_max_pages(),
        }
    }
}

fn default_catalog_url() -> String {
    "https://debridmediamanager.com".to_string()
}

fn default_catalog_timeout() -> u32 {
    20
}

fn default_max_pages() -> u32 {
    50
}

/// Trusted time source used to timestamp challenge tokens
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TimeSourceConfig {
    /// Endpoint returning the current time as an ISO-8601 string
    #[serde(default = "default_time_url")]
    pub url: String,
    /// Request timeout in seconds (default: 10)
    #[serde(default = "default_time_timeout")]
    pub timeout_secs: u32,
    /// Divergence from the local clock that gets logged (default: 30)
    #[serde(default = "default_max_clock_skew")]
    pub max_clock_skew_secs: u64,
}

impl Default for TimeSourceConfig {
    fn default() -> Self {
        Self {
            url: default_time_url(),
            timeout_secs: default_time_timeout(),
            max_clock_skew_secs: default_max_clock_skew(),
        }
    }
}

fn default_time_url() -> String {
    "https://api.real-debrid.com/rest/1.0/time/iso".to_string()
}

fn default_time_timeout() -> u32 {
    10
}

fn default_max_clock_skew() -> u64 {
    30
}

/// Relevance filter configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FilterConfig {
    /// Replaces the built-in relevance pattern when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

/// Cache hint configuration (all values in seconds)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    #[serde(default = "default_max_age")]
    pub max_age_secs: u64,
    #[serde(default = "default_max_age_empty")]
    pub max_age_empty_secs: u64,
    #[serde(default = "default_stale_revalidate")]
    pub stale_revalidate_secs: u64,
    #[serde(default = "default_stale_error")]
    pub stale_error_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_age_secs: default_max_age(),
            max_age_empty_secs: default_max_age_empty(),
            stale_revalidate_secs: default_stale_revalidate(),
            stale_error_secs: default_stale_error(),
        }
    }
}

fn default_max_age() -> u64 {
    60 * 60
}

fn default_max_age_empty() -> u64 {
    60
}

fn default_stale_revalidate() -> u64 {
    4 * 60 * 60
}

fn default_stale_error() -> u64 {
    7 * 24 * 60 * 60
}

/// Sanitized config for API responses
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub catalog: CatalogConfig,
    pub time_source: TimeSourceConfig,
    pub filter: SanitizedFilterConfig,
    pub cache: CacheConfig,
}

/// The override pattern can be long, only report whether one is set
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedFilterConfig {
    pub custom_pattern: bool,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            catalog: config.catalog.clone(),
            time_source: config.time_source.clone(),
            filter: SanitizedFilterConfig {
                custom_pattern: config.filter.pattern.is_some(),
            },
            cache: config.cache.clone(),
        }
    }
}
