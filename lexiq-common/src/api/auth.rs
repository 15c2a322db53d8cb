//! Bearer token helpers
//!
//! The token scheme is a stub: tokens are opaque random strings issued at
//! login and looked up server-side. Credentials are not verified against
//! any user database.

use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Identity attached to an authenticated request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub user_id: String,
    pub username: String,
    /// Bearer token the request presented (empty for the anonymous principal)
    #[serde(skip)]
    pub token: String,
}

impl Principal {
    /// Principal used for every request when authentication is disabled
    pub fn anonymous() -> Self {
        Self {
            user_id: "anonymous".to_string(),
            username: "anonymous".to_string(),
            token: String::new(),
        }
    }
}

/// Bearer header problems
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// No Authorization header
    Missing,
    /// Header present but not `Bearer <token>`
    Malformed,
}

impl std::fmt::Display for TokenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenError::Missing => write!(f, "Missing bearer token"),
            TokenError::Malformed => write!(f, "Malformed Authorization header"),
        }
    }
}

impl std::error::Error for TokenError {}

/// Generate a 256-bit random token, hex encoded (64 chars)
pub fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Stable user id for a username: first 16 hex chars of SHA-256
///
/// # Examples
///
/// ```
/// use lexiq_common::api::auth::derive_user_id;
///
/// let id = derive_user_id("alice");
/// assert_eq!(id.len(), 16);
/// assert_eq!(id, derive_user_id("alice"));
/// ```
pub fn derive_user_id(username: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(username.as_bytes());
    let digest = format!("{:x}", hasher.finalize());
    digest[..16].to_string()
}

/// Extract the token from an `Authorization` header value
pub fn parse_bearer(header: Option<&str>) -> Result<String, TokenError> {
    let header = header.ok_or(TokenError::Missing)?;
    let (scheme, token) = header.trim().split_once(' ').ok_or(TokenError::Malformed)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(TokenError::Malformed);
    }
    let token = token.trim();
    if token.is_empty() {
        return Err(TokenError::Malformed);
    }
    Ok(token.to_string())
}
