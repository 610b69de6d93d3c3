//! Core types and shared functionality for pluck.
//!
//! This crate provides:
//! - In-memory TTL cache with an injectable clock
//! - Cache key construction
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;

pub use cache::{Clock, MemoryCache, SystemClock, cache_key, content_hash};
pub use config::AppConfig;
pub use error::Error;
