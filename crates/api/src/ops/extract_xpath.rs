//! extract-xpath endpoint: static-markup XPath selection over normalized
//! XHTML.

use serde::{Deserialize, Serialize};

use pluck_client::extract_xpath;
use pluck_core::{Error, cache_key};

use crate::context::AppContext;

/// Input for extract-xpath: a target page and an XPath expression.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct XPathParams {
    pub url: String,
    pub xpath: String,
}

/// Fetch `url`, normalize the markup, evaluate `xpath`, return one string
/// form per matched node. Results are cached by (url, xpath) under the
/// default TTL.
pub async fn extract_xpath_impl(
    ctx: &AppContext, params: XPathParams,
) -> Result<Vec<String>, Error> {
    if params.url.trim().is_empty() {
        return Err(Error::InvalidInput("url is required".into()));
    }
    if params.xpath.trim().is_empty() {
        return Err(Error::InvalidInput("xpath is required".into()));
    }

    let key = cache_key("xpath", &params.url, &params.xpath);
    if let Some(hit) = ctx.cache.get(&key) {
        tracing::debug!(key, "serving extract-xpath from cache");
        return Ok(hit);
    }

    let body = ctx.fetcher.fetch(&params.url).await?;
    let values = extract_xpath(&body, &params.xpath)?;

    ctx.cache.set(&key, values.clone());
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pluck_core::AppConfig;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_missing_xpath_rejected() {
        let ctx = AppContext::new(AppConfig::default()).unwrap();
        let params = XPathParams { url: "https://example.test/".into(), xpath: " ".into() };
        let err = extract_xpath_impl(&ctx, params).await.unwrap_err();
        assert_eq!(err.http_status(), 400);
    }

    #[tokio::test]
    async fn test_end_to_end_attribute_values() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/links"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<html><body><a href="/one">1</a><a href="/two">2</a></body></html>"#,
            ))
            .mount(&server)
            .await;

        let ctx = AppContext::new(AppConfig::default()).unwrap();
        let params = XPathParams { url: format!("{}/links", server.uri()), xpath: "//a/@href".into() };
        let values = extract_xpath_impl(&ctx, params).await.unwrap();
        assert_eq!(values, vec!["/one", "/two"]);
    }

    #[tokio::test]
    async fn test_fetch_error_propagates() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/gone"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let ctx = AppContext::new(AppConfig::default()).unwrap();
        let params = XPathParams { url: format!("{}/gone", server.uri()), xpath: "//p".into() };
        let err = extract_xpath_impl(&ctx, params).await.unwrap_err();
        assert!(matches!(err, Error::Fetch(_)));
    }
}
