//! CSS selection over raw HTML.

use pluck_core::Error;
use scraper::{Html, Selector};

/// Extract the trimmed text content of every element matching `selector`,
/// in document order. The parser tolerates malformed markup natively, so
/// no normalization pass is needed here.
pub fn extract_css(html: &str, selector: &str) -> Result<Vec<String>, Error> {
    let parsed = Selector::parse(selector)
        .map_err(|e| Error::Extract(format!("invalid selector: {e}")))?;

    let document = Html::parse_document(html);

    Ok(document
        .select(&parsed)
        .map(|element| element.text().collect::<String>().trim().to_string())
        .collect())
}
