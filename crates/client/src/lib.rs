//! Extraction engine for pluck.
//!
//! This crate provides the three extraction strategies behind the service:
//! static-markup CSS selection, static-markup XPath selection over
//! normalized XHTML, and rendered selection through a short-lived headless
//! browser session, plus the retrying fetch pipeline that feeds them.

pub mod extract;
pub mod fetch;
#[cfg(feature = "render")]
pub mod render;

pub use extract::{extract_css, extract_xpath, normalize_to_xhtml};
pub use fetch::{FetchClient, FetchConfig};
#[cfg(feature = "render")]
pub use render::render_extract;
