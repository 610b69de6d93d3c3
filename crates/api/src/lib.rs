//! Operation layer for pluck.
//!
//! One `*_impl` function per endpoint, plus the batch orchestrator. The
//! HTTP routing/transport shell is an external collaborator: it
//! deserializes request bodies into the parameter structs here, calls the
//! matching operation with the shared [`AppContext`], and serializes the
//! result or the `(status, {error})` pair from [`error`].

pub mod context;
pub mod error;
pub mod ops;

pub use context::AppContext;
pub use error::{ErrorBody, response_parts};
