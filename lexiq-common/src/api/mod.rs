//! API module for shared HTTP API functionality
//!
//! Contains ONLY framework-independent pieces: bearer token helpers and the
//! response envelope types. Each service wraps these with its own axum
//! middleware and `IntoResponse` impls.

pub mod auth;
pub mod types;

pub use auth::{derive_user_id, generate_token, parse_bearer, Principal, TokenError};
pub use types::{short_request_id, ApiResponse, ErrorResponse};
