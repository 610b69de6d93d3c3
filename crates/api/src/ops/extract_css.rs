//! extract-css endpoint: static-markup CSS selection.

use serde::{Deserialize, Serialize};

use pluck_client::extract_css;
use pluck_core::{Error, cache_key};

use crate::context::AppContext;

/// Input for extract-css and render-extract: a target page and a CSS
/// selector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectorParams {
    pub url: String,
    pub selector: String,
}

/// Fetch `url`, select with `selector`, return trimmed text per match.
/// Results are cached by (url, selector) under the default TTL.
pub async fn extract_css_impl(
    ctx: &AppContext, params: SelectorParams,
) -> Result<Vec<String>, Error> {
    if params.url.trim().is_empty() {
        return Err(Error::InvalidInput("url is required".into()));
    }
    if params.selector.trim().is_empty() {
        return Err(Error::InvalidInput("selector is required".into()));
    }

    let key = cache_key("css", &params.url, &params.selector);
    if let Some(hit) = ctx.cache.get(&key) {
        tracing::debug!(key, "serving extract-css from cache");
        return Ok(hit);
    }

    let body = ctx.fetcher.fetch(&params.url).await?;
    let values = extract_css(&body, &params.selector)?;

    ctx.cache.set(&key, values.clone());
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pluck_core::AppConfig;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn ctx() -> AppContext {
        AppContext::new(AppConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn test_missing_url_rejected() {
        let params = SelectorParams { url: "  ".into(), selector: "h1".into() };
        let err = extract_css_impl(&ctx(), params).await.unwrap_err();
        assert_eq!(err.http_status(), 400);
    }

    #[tokio::test]
    async fn test_missing_selector_rejected() {
        let params = SelectorParams { url: "https://example.test/".into(), selector: "".into() };
        let err = extract_css_impl(&ctx(), params).await.unwrap_err();
        assert_eq!(err.http_status(), 400);
    }

    #[tokio::test]
    async fn test_end_to_end_single_h1() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string("<html><body><h1>Title</h1></body></html>"),
            )
            .mount(&server)
            .await;

        let ctx = ctx();
        let params = SelectorParams { url: format!("{}/page", server.uri()), selector: "h1".into() };
        let values = extract_css_impl(&ctx, params).await.unwrap();
        assert_eq!(values, vec!["Title"]);
    }

    #[tokio::test]
    async fn test_second_call_served_from_cache() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/cached"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<p>once</p>"))
            .expect(1)
            .mount(&server)
            .await;

        let ctx = ctx();
        let params = SelectorParams { url: format!("{}/cached", server.uri()), selector: "p".into() };

        let first = extract_css_impl(&ctx, params.clone()).await.unwrap();
        let second = extract_css_impl(&ctx, params).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first, vec!["once"]);
    }
}
