//! Shared application state for the operation layer.

use pluck_client::{FetchClient, FetchConfig};
use pluck_core::{AppConfig, Error, MemoryCache};

/// Process-wide state: configuration, the shared TTL cache, and the fetch
/// client. Built once by the external shell and shared across handlers.
///
/// The cache is the only mutable piece; its own locking makes sharing a
/// single `AppContext` behind an `Arc` sufficient.
pub struct AppContext {
    pub config: AppConfig,
    pub cache: MemoryCache,
    pub fetcher: FetchClient,
}

impl AppContext {
    /// Build a context from loaded configuration.
    pub fn new(config: AppConfig) -> Result<Self, Error> {
        let fetcher = FetchClient::new(FetchConfig::from_app_config(&config))?;
        let cache = MemoryCache::new(config.cache_ttl());
        Ok(Self { config, cache, fetcher })
    }

    /// Build a context with an injected cache, for deterministic tests.
    pub fn with_cache(config: AppConfig, cache: MemoryCache) -> Result<Self, Error> {
        let fetcher = FetchClient::new(FetchConfig::from_app_config(&config))?;
        Ok(Self { config, cache, fetcher })
    }
}
