//! Static-markup extraction strategies.
//!
//! Two entry points over already-fetched markup:
//! - [`extract_css`]: selector-queryable tree, no normalization needed.
//! - [`extract_xpath`]: tolerant parse re-serialized as well-formed XHTML
//!   so an XML-oriented XPath engine can traverse it.

pub mod css;
pub mod xpath;

pub use css::extract_css;
pub use xpath::{extract_xpath, normalize_to_xhtml};
