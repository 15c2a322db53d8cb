//! Shared API response envelopes
//!
//! Every JSON endpoint except the analysis results themselves answers with
//! `ApiResponse`; failures answer with `ErrorResponse`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// First eight characters of a fresh UUID, used to correlate log lines
/// with envelopes
pub fn short_request_id() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}

/// Standard success envelope
///
/// # Examples
///
/// ```
/// use lexiq_common::api::types::ApiResponse;
///
/// let response = ApiResponse::ok(serde_json::json!({"token": "abc"}))
///     .with_message("Login successful");
/// assert!(response.success);
/// assert_eq!(response.request_id.len(), 8);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T = Value> {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub request_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Success envelope carrying `data`
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: String::new(),
            timestamp: Utc::now(),
            request_id: short_request_id(),
            data: Some(data),
            error_code: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }
}

impl ApiResponse<Value> {
    /// Success envelope without payload
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            timestamp: Utc::now(),
            request_id: short_request_id(),
            data: None,
            error_code: None,
        }
    }
}

/// Error envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    /// Human-readable error message
    pub message: String,
    /// Machine-readable error identifier (e.g. `VALIDATION_ERROR`)
    pub error_code: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ErrorResponse {
    pub fn new(error_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            error_code: error_code.into(),
            timestamp: Utc::now(),
            details: None,
        }
    }

    pub fn with_details(
        error_code: impl Into<String>,
        message: impl Into<String>,
        details: Value,
    ) -> Self {
        Self {
            details: Some(details),
            ..Self::new(error_code, message)
        }
    }
}
