//! HTTP fetch pipeline with browser-like headers and retry on transient
//! failures.
//!
//! ### Request shape
//! - Browser-emulating header set: User-Agent, Accept, Accept-Language,
//!   Referer (Accept-Encoding comes from reqwest's gzip/brotli/deflate).
//! - 30s timeout, up to 5 redirects, any final status in `[200, 400)`
//!   counts as success.
//!
//! ### Failure classification
//! - No HTTP status (network error, timeout) or status 503: retryable.
//! - Any other status: fatal, propagates immediately.
//! - Retryable failures get up to 3 attempts total with jittered
//!   exponential backoff (see [`retry`]).

pub mod retry;

use std::time::{Duration, Instant};

use reqwest::{Client, header};

use pluck_core::{AppConfig, Error};
use retry::{FetchFailure, retry_with_backoff};

/// Configuration for the fetch client.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// User agent string.
    pub user_agent: String,

    /// Accept-Language header value.
    pub accept_language: String,

    /// Referer header value.
    pub referer: String,

    /// Request timeout (default: 30s).
    pub timeout: Duration,

    /// Maximum number of redirects to follow (default: 5).
    pub max_redirects: usize,

    /// Maximum response body size in bytes (default: 5MB).
    pub max_bytes: usize,

    /// Total attempts for retryable failures (default: 3).
    pub retry_attempts: u32,

    /// Base backoff delay (default: 800ms).
    pub retry_base_delay: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self::from_app_config(&AppConfig::default())
    }
}

impl FetchConfig {
    /// Derive fetch settings from the application configuration.
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            user_agent: config.user_agent.clone(),
            accept_language: config.accept_language.clone(),
            referer: config.referer.clone(),
            timeout: config.timeout(),
            max_redirects: config.max_redirects,
            max_bytes: config.max_bytes,
            retry_attempts: config.retry_attempts,
            retry_base_delay: Duration::from_millis(config.retry_base_delay_ms),
        }
    }
}

/// HTTP fetch client with retry on transient failures.
pub struct FetchClient {
    http: Client,
    config: FetchConfig,
}

impl FetchClient {
    /// Create a new fetch client with the given configuration.
    pub fn new(config: FetchConfig) -> Result<Self, Error> {
        let mut default_headers = header::HeaderMap::new();
        default_headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8",
            ),
        );
        if let Ok(value) = header::HeaderValue::from_str(&config.accept_language) {
            default_headers.insert(header::ACCEPT_LANGUAGE, value);
        }
        if let Ok(value) = header::HeaderValue::from_str(&config.referer) {
            default_headers.insert(header::REFERER, value);
        }

        let http = Client::builder()
            .user_agent(&config.user_agent)
            .default_headers(default_headers)
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::Fetch(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http, config })
    }

    /// Fetch a URL, returning the decoded body.
    ///
    /// Retries transient failures (no status, or 503) with jittered
    /// exponential backoff; after exhaustion or on a fatal status the last
    /// failure propagates as [`Error::Fetch`].
    pub async fn fetch(&self, url: &str) -> Result<String, Error> {
        let start = Instant::now();

        let body = retry_with_backoff(
            self.config.retry_attempts,
            self.config.retry_base_delay,
            || self.fetch_once(url),
        )
        .await
        .map_err(|failure| Error::Fetch(failure.message))?;

        tracing::debug!(
            url,
            fetch_ms = start.elapsed().as_millis() as u64,
            bytes = body.len(),
            "fetched document"
        );

        Ok(body)
    }

    async fn fetch_once(&self, url: &str) -> Result<String, FetchFailure> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| FetchFailure::network(format!("network error: {e}")))?;

        let status = response.status();
        if !(200..400).contains(&status.as_u16()) {
            let reason = status.canonical_reason().unwrap_or("");
            return Err(FetchFailure::status(
                status.as_u16(),
                format!("status {} {}", status.as_u16(), reason).trim_end().to_string(),
            ));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchFailure::network(format!("failed to read response: {e}")))?;

        if bytes.len() > self.config.max_bytes {
            // Oversized upstream bodies will not shrink on retry.
            return Err(FetchFailure::status(
                status.as_u16(),
                format!("{} bytes exceeds {}", bytes.len(), self.config.max_bytes),
            ));
        }

        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Get reference to the configuration.
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn quick_config() -> FetchConfig {
        FetchConfig {
            retry_base_delay: Duration::from_millis(5),
            ..FetchConfig::default()
        }
    }

    #[test]
    fn test_fetch_config_defaults() {
        let config = FetchConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.max_redirects, 5);
        assert_eq!(config.max_bytes, 5 * 1024 * 1024);
        assert_eq!(config.retry_attempts, 3);
        assert_eq!(config.retry_base_delay, Duration::from_millis(800));
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<h1>Title</h1>"))
            .mount(&server)
            .await;

        let client = FetchClient::new(quick_config()).unwrap();
        let body = client.fetch(&format!("{}/page", server.uri())).await.unwrap();
        assert_eq!(body, "<h1>Title</h1>");
    }

    #[tokio::test]
    async fn test_fetch_sends_browser_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ua"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .expect(1)
            .mount(&server)
            .await;

        let config = quick_config();
        let client = FetchClient::new(config.clone()).unwrap();
        client.fetch(&format!("{}/ua", server.uri())).await.unwrap();

        // Assert on the raw captured request; matcher-based header checks
        // split comma-separated values and cannot express the combined
        // Accept-Language the client sends.
        let requests = server.received_requests().await.unwrap();
        let headers = &requests[0].headers;
        let value = |name: &str| headers.get(name).unwrap().to_str().unwrap();
        assert_eq!(value("user-agent"), config.user_agent);
        assert_eq!(value("accept-language"), "en-US,en;q=0.9");
        assert_eq!(value("referer"), "https://www.google.com/");
        assert!(value("accept").contains("text/html"));
    }

    #[tokio::test]
    async fn test_retries_on_503_then_succeeds() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/flaky"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(2)
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/flaky"))
            .respond_with(ResponseTemplate::new(200).set_body_string("recovered"))
            .expect(1)
            .mount(&server)
            .await;

        let client = FetchClient::new(quick_config()).unwrap();
        let body = client.fetch(&format!("{}/flaky", server.uri())).await.unwrap();
        assert_eq!(body, "recovered");
    }

    #[tokio::test]
    async fn test_404_is_fatal_and_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let client = FetchClient::new(quick_config()).unwrap();
        let err = client.fetch(&format!("{}/missing", server.uri())).await.unwrap_err();
        assert!(err.to_string().contains("404"));
    }

    #[tokio::test]
    async fn test_503_exhaustion_propagates_last_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/down"))
            .respond_with(ResponseTemplate::new(503))
            .expect(3)
            .mount(&server)
            .await;

        let client = FetchClient::new(quick_config()).unwrap();
        let err = client.fetch(&format!("{}/down", server.uri())).await.unwrap_err();
        assert!(err.to_string().contains("503"));
    }

    #[tokio::test]
    async fn test_oversized_body_is_fatal() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/huge"))
            .respond_with(ResponseTemplate::new(200).set_body_string("x".repeat(64)))
            .expect(1)
            .mount(&server)
            .await;

        let config = FetchConfig { max_bytes: 16, ..quick_config() };
        let client = FetchClient::new(config).unwrap();
        let err = client.fetch(&format!("{}/huge", server.uri())).await.unwrap_err();
        assert!(err.to_string().contains("exceeds"));
    }
}
