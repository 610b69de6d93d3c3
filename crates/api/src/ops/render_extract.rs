//! render-extract endpoint: selection against the script-rendered DOM.

use pluck_core::{Error, cache_key};

use crate::context::AppContext;
use crate::ops::extract_css::SelectorParams;

/// Render `url` in a dedicated headless-browser session and return the
/// trimmed text of every `selector` match. Results are cached by
/// (url, selector) under the default TTL; the session itself is never
/// reused.
pub async fn render_extract_impl(
    ctx: &AppContext, params: SelectorParams,
) -> Result<Vec<String>, Error> {
    if params.url.trim().is_empty() {
        return Err(Error::InvalidInput("url is required".into()));
    }
    if params.selector.trim().is_empty() {
        return Err(Error::InvalidInput("selector is required".into()));
    }

    let key = cache_key("render", &params.url, &params.selector);
    if let Some(hit) = ctx.cache.get(&key) {
        tracing::debug!(key, "serving render-extract from cache");
        return Ok(hit);
    }

    let values = render(ctx, &params.url, &params.selector).await?;

    ctx.cache.set(&key, values.clone());
    Ok(values)
}

#[cfg(feature = "render")]
pub(crate) async fn render(ctx: &AppContext, url: &str, selector: &str) -> Result<Vec<String>, Error> {
    pluck_client::render_extract(&ctx.config, url, selector).await
}

#[cfg(not(feature = "render"))]
pub(crate) async fn render(_ctx: &AppContext, _url: &str, _selector: &str) -> Result<Vec<String>, Error> {
    Err(Error::RenderDisabled)
}
