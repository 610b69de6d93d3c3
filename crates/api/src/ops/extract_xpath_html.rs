//! extract-xpath-html endpoint: XPath over caller-submitted markup.
//!
//! For clients that already hold the markup (e.g. from a browser session
//! elsewhere), this skips the fetcher entirely. The expression arrives
//! out-of-band (query parameter or header), resolved by the routing shell
//! into [`RawHtmlParams::xpath`]. Caching is by content hash rather than
//! URL so identical markup from different callers shares one entry, under
//! the longer static-markup TTL.

use serde::{Deserialize, Serialize};

use pluck_client::extract_xpath;
use pluck_core::{Error, cache_key, content_hash};

use crate::context::AppContext;

/// Input for extract-xpath-html: the raw request body plus the expression
/// the router pulled from the `xpath`/`xp` query parameter or `x-xpath`
/// header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawHtmlParams {
    pub html: String,
    #[serde(default)]
    pub xpath: Option<String>,
}

/// Evaluate an XPath expression against submitted markup.
pub async fn extract_xpath_html_impl(
    ctx: &AppContext, params: RawHtmlParams,
) -> Result<Vec<String>, Error> {
    if params.html.trim().is_empty() {
        return Err(Error::InvalidInput("request body is empty".into()));
    }
    if params.html.len() > ctx.config.max_bytes {
        return Err(Error::PayloadTooLarge(format!(
            "{} bytes exceeds {}",
            params.html.len(),
            ctx.config.max_bytes
        )));
    }
    let xpath = match params.xpath.as_deref().map(str::trim) {
        Some(expression) if !expression.is_empty() => expression,
        _ => return Err(Error::InvalidInput("missing xpath expression".into())),
    };

    let key = cache_key("xpath-html", &content_hash(params.html.as_bytes()), xpath);
    if let Some(hit) = ctx.cache.get(&key) {
        tracing::debug!(key, "serving extract-xpath-html from cache");
        return Ok(hit);
    }

    let values = extract_xpath(&params.html, xpath)?;

    ctx.cache.set_with_ttl(&key, values.clone(), ctx.config.html_cache_ttl());
    Ok(values)
}
