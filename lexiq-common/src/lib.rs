//! # LexiQ Common Library
//!
//! Shared code for LexiQ services including:
//! - Error types
//! - Bootstrap configuration loading and root folder resolution
//! - Event types (AnalysisEvent enum) and the EventBus
//! - Injectable key/value stores
//! - Service lifecycle trait
//! - API envelope types and bearer token helpers
//! - SSE stream helpers

pub mod api;
pub mod config;
pub mod error;
pub mod events;
pub mod lifecycle;
pub mod sse;
pub mod store;

pub use error::{Error, Result};
pub use lifecycle::Service;
pub use store::{InMemoryStore, Store};
