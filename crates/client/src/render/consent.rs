//! Best-effort consent-wall dismissal.
//!
//! When navigation lands on a known consent/identity gate, candidate
//! accept-button selectors are tried in order; the first successful click
//! wins and every failure is swallowed. Extraction proceeds against
//! whatever page state results, so nothing here is fatal.

use std::sync::LazyLock;

use chromiumoxide::Page;
use regex::Regex;
use tokio::time::{Duration, sleep};

static CONSENT_GATES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^https?://(consent\.(google|youtube)\.[a-z.]+|consent\.yahoo\.com|guce\.yahoo\.com|myprivacy\.[a-z.]+)/",
    )
    .expect("consent gate pattern is valid")
});

/// Accept-button candidates, most specific first.
const ACCEPT_SELECTORS: &[&str] = &[
    "button#L2AGLb",
    r#"form[action*="consent"] button"#,
    "#onetrust-accept-btn-handler",
    r#"button[aria-label*="Accept"]"#,
    r#"button[mode="primary"]"#,
];

const POST_CLICK_SETTLE: Duration = Duration::from_millis(750);

/// Result of a dismissal attempt: `Unattempted -> Searching -> Dismissed |
/// Exhausted`, collapsed to the terminal states callers can observe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsentOutcome {
    /// Current URL is not a known consent gate.
    NotApplicable,
    /// A candidate was found and clicked.
    Dismissed(&'static str),
    /// No candidate could be found or clicked; proceed anyway.
    Exhausted,
}

/// Whether a URL belongs to a known consent/identity gate.
pub fn is_consent_gate(url: &str) -> bool {
    CONSENT_GATES.is_match(url)
}

/// Try to dismiss a consent wall on the current page.
pub async fn dismiss(page: &Page) -> ConsentOutcome {
    let current = match page.url().await {
        Ok(Some(url)) => url,
        _ => return ConsentOutcome::NotApplicable,
    };

    if !is_consent_gate(&current) {
        return ConsentOutcome::NotApplicable;
    }

    for selector in ACCEPT_SELECTORS {
        let Ok(button) = page.find_element(*selector).await else {
            continue;
        };
        match button.click().await {
            Ok(_) => {
                sleep(POST_CLICK_SETTLE).await;
                tracing::debug!(selector, "consent wall dismissed");
                return ConsentOutcome::Dismissed(selector);
            }
            Err(e) => {
                tracing::debug!(selector, error = %e, "consent candidate click failed");
            }
        }
    }

    tracing::warn!(url = %current, "consent wall not dismissed, extracting from current page state");
    ConsentOutcome::Exhausted
}
