//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (PLUCK_*)
//! 2. TOML config file (if PLUCK_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (PLUCK_*)
/// 2. TOML config file (if PLUCK_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// User-Agent string used for both plain fetches and browser sessions,
    /// so the fingerprint is consistent across strategies.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Accept-Language header for fetches.
    #[serde(default = "default_accept_language")]
    pub accept_language: String,

    /// Referer header for fetches.
    #[serde(default = "default_referer")]
    pub referer: String,

    /// HTTP request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Maximum number of redirects to follow.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,

    /// Maximum bytes accepted per fetched or submitted document.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,

    /// Total fetch attempts for retryable failures.
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,

    /// Base backoff delay in milliseconds; doubles per attempt with ±25%
    /// jitter.
    #[serde(default = "default_retry_base_delay_ms")]
    pub retry_base_delay_ms: u64,

    /// TTL for cached single-task results, in seconds.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// TTL for cached raw-markup results, in seconds. Longer than the URL
    /// TTL because submitted markup is already static.
    #[serde(default = "default_html_cache_ttl_secs")]
    pub html_cache_ttl_secs: u64,

    /// Browser navigation timeout in milliseconds.
    #[serde(default = "default_nav_timeout_ms")]
    pub nav_timeout_ms: u64,

    /// Explicit browser executable path. When unset, the automation
    /// binding's own detection is used.
    #[serde(default)]
    pub browser_executable: Option<PathBuf>,
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
        .into()
}

fn default_accept_language() -> String {
    "en-US,en;q=0.9".into()
}

fn default_referer() -> String {
    "https://www.google.com/".into()
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_max_redirects() -> usize {
    5
}

fn default_max_bytes() -> usize {
    5_242_880 // 5MB
}

fn default_retry_attempts() -> u32 {
    3
}

fn default_retry_base_delay_ms() -> u64 {
    800
}

fn default_cache_ttl_secs() -> u64 {
    60
}

fn default_html_cache_ttl_secs() -> u64 {
    300
}

fn default_nav_timeout_ms() -> u64 {
    30_000
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            accept_language: default_accept_language(),
            referer: default_referer(),
            timeout_ms: default_timeout_ms(),
            max_redirects: default_max_redirects(),
            max_bytes: default_max_bytes(),
            retry_attempts: default_retry_attempts(),
            retry_base_delay_ms: default_retry_base_delay_ms(),
            cache_ttl_secs: default_cache_ttl_secs(),
            html_cache_ttl_secs: default_html_cache_ttl_secs(),
            nav_timeout_ms: default_nav_timeout_ms(),
            browser_executable: None,
        }
    }
}

impl AppConfig {
    /// Fetch timeout as a Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Navigation timeout as a Duration.
    pub fn nav_timeout(&self) -> Duration {
        Duration::from_millis(self.nav_timeout_ms)
    }

    /// Default cache TTL as a Duration.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// Raw-markup cache TTL as a Duration.
    pub fn html_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.html_cache_ttl_secs)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `PLUCK_`
    /// 2. TOML file from `PLUCK_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read, a variable cannot
    /// be parsed, or validation fails after loading.
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("PLUCK_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("PLUCK_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}
