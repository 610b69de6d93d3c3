//! Boundary error mapping.
//!
//! Single-task endpoints surface failures as `(status, {error: message})`
//! where the message is the short classified string from the core error,
//! never a stack trace.

use serde::Serialize;

use pluck_core::Error;

/// JSON error body: `{"error": "<classified message>"}`.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Status code and body for an operation failure.
pub fn response_parts(err: &Error) -> (u16, ErrorBody) {
    (err.http_status(), ErrorBody { error: err.to_string() })
}
