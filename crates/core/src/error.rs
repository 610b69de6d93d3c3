//! Unified error types for pluck.
//!
//! Every failure surfaced to a caller is one of these variants, with a
//! short classified message rather than a raw stack trace. The transport
//! layer maps each variant to an HTTP status via [`Error::http_status`].

/// Unified error types for the extraction engine.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., missing selector, empty body).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// Submitted payload exceeds the configured size limit.
    #[error("PAYLOAD_TOO_LARGE: {0}")]
    PayloadTooLarge(String),

    /// Fetch failed: network error, timeout, or non-retryable HTTP status,
    /// after internal retries were exhausted where applicable.
    #[error("FETCH_FAILED: {0}")]
    Fetch(String),

    /// Selector/expression was malformed or the content could not be
    /// parsed or evaluated.
    #[error("EXTRACT_FAILED: {0}")]
    Extract(String),

    /// Browser launch or navigation failed.
    #[error("BROWSER_FAILED: {0}")]
    Browser(String),

    /// Rendered extraction was compiled out.
    #[error("RENDER_DISABLED")]
    RenderDisabled,

    /// Batch task carried an unrecognized type tag. Recorded per-task,
    /// never surfaced as a top-level failure.
    #[error("Unknown task type: {0}")]
    UnknownTaskType(String),
}

impl Error {
    /// HTTP status code this error maps to at the service boundary.
    pub fn http_status(&self) -> u16 {
        match self {
            Error::InvalidInput(_) => 400,
            Error::PayloadTooLarge(_) => 413,
            Error::Fetch(_)
            | Error::Extract(_)
            | Error::Browser(_)
            | Error::RenderDisabled
            | Error::UnknownTaskType(_) => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_classified() {
        let err = Error::Fetch("status 503 Service Unavailable".to_string());
        assert_eq!(err.to_string(), "FETCH_FAILED: status 503 Service Unavailable");
    }

    #[test]
    fn test_invalid_input_is_400() {
        assert_eq!(Error::InvalidInput("url is required".into()).http_status(), 400);
    }

    #[test]
    fn test_payload_too_large_is_413() {
        assert_eq!(Error::PayloadTooLarge("6000000 bytes".into()).http_status(), 413);
    }

    #[test]
    fn test_engine_failures_are_500() {
        assert_eq!(Error::Fetch("timeout".into()).http_status(), 500);
        assert_eq!(Error::Extract("bad selector".into()).http_status(), 500);
        assert_eq!(Error::Browser("launch failed".into()).http_status(), 500);
        assert_eq!(Error::RenderDisabled.http_status(), 500);
    }

    #[test]
    fn test_unknown_task_type_message() {
        let err = Error::UnknownTaskType("regex".into());
        assert!(err.to_string().starts_with("Unknown task type"));
    }
}
