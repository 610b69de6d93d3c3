//! Endpoint operation implementations.
//!
//! Each module holds one endpoint's parameter struct and `*_impl`
//! function: validate input, consult the shared cache, run the matching
//! extraction strategy, store the result. The batch orchestrator runs
//! heterogeneous task lists with per-task failure isolation.

pub mod batch;
pub mod extract_css;
pub mod extract_xpath;
pub mod extract_xpath_html;
pub mod render_extract;

pub use batch::{BatchParams, ExtractionTask, TaskOutcome, run_batch_impl};
pub use extract_css::{SelectorParams, extract_css_impl};
pub use extract_xpath::{XPathParams, extract_xpath_impl};
pub use extract_xpath_html::{RawHtmlParams, extract_xpath_html_impl};
pub use render_extract::render_extract_impl;
