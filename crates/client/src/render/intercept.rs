//! Request-interception policy.
//!
//! Pure decision logic, kept separate from the CDP glue so it can be
//! tested without a browser: abort sub-resource requests that cannot
//! contribute to text extraction (images, fonts, media) and anything
//! headed for a known ad/tracking host.

use std::sync::LazyLock;

use chromiumoxide::cdp::browser_protocol::network::ResourceType;
use regex::RegexSet;

static AD_HOSTS: LazyLock<RegexSet> = LazyLock::new(|| {
    RegexSet::new([
        r"doubleclick\.net",
        r"googlesyndication\.com",
        r"google-analytics\.com",
        r"googletagmanager\.com",
        r"adservice\.google\.",
        r"connect\.facebook\.net",
        r"scorecardresearch\.com",
        r"quantserve\.com",
        r"taboola\.com",
        r"outbrain\.com",
        r"criteo\.(com|net)",
        r"amazon-adsystem\.com",
        r"adnxs\.com",
    ])
    .expect("ad host patterns are valid")
});

/// Whether an outgoing request should be aborted instead of continued.
pub fn should_abort(resource_type: &ResourceType, url: &str) -> bool {
    is_blocked_resource(resource_type) || is_ad_host(url)
}

fn is_blocked_resource(resource_type: &ResourceType) -> bool {
    matches!(resource_type, ResourceType::Image | ResourceType::Font | ResourceType::Media)
}

fn is_ad_host(url: &str) -> bool {
    AD_HOSTS.is_match(url)
}
