//! Cache key construction.
//!
//! Keys are deterministic joins of (route tag, target, expression); the
//! raw-markup endpoint substitutes a SHA-256 content hash for the target so
//! identical markup from different callers collides onto one entry.

use sha2::{Digest, Sha256};

const SEPARATOR: &str = "::";

/// Build a cache key from a route tag, target identifier, and selection
/// expression. Absent (empty) components are omitted rather than kept as
/// empty segments, so `("css", "u", "")` and `("css", "u")` agree.
pub fn cache_key(route: &str, target: &str, expression: &str) -> String {
    [route, target, expression]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(SEPARATOR)
}

/// Lowercase hex SHA-256 of a submitted document body.
pub fn content_hash(body: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(body);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_determinism() {
        let a = cache_key("css", "https://example.com", "h1");
        let b = cache_key("css", "https://example.com", "h1");
        assert_eq!(a, b);
    }

    #[test]
    fn test_key_sensitive_to_each_component() {
        let base = cache_key("css", "https://example.com", "h1");
        assert_ne!(base, cache_key("xpath", "https://example.com", "h1"));
        assert_ne!(base, cache_key("css", "https://example.org", "h1"));
        assert_ne!(base, cache_key("css", "https://example.com", "h2"));
    }

    #[test]
    fn test_absent_components_omitted() {
        assert_eq!(cache_key("render", "https://example.com", ""), "render::https://example.com");
    }

    #[test]
    fn test_content_hash_stability() {
        let a = content_hash(b"<div>X</div>");
        let b = content_hash(b"<div>X</div>");
        assert_eq!(a, b);
        assert_ne!(a, content_hash(b"<div>Y</div>"));
    }

    #[test]
    fn test_content_hash_format() {
        let hash = content_hash(b"body");
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
