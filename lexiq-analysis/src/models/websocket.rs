//! WebSocket frame models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Inbound frame
///
/// `type` is optional: a bare `{content, language, domain}` object is a
/// realtime analysis request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebSocketMessage {
    #[serde(rename = "type", default)]
    pub message_type: Option<String>,
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub request_id: Option<String>,
}

/// Outbound frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebSocketResponse {
    #[serde(rename = "type")]
    pub message_type: String,
    pub data: Value,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl WebSocketResponse {
    pub fn ok(message_type: impl Into<String>, data: Value, request_id: Option<String>) -> Self {
        Self {
            message_type: message_type.into(),
            data,
            success: true,
            error: None,
            timestamp: Utc::now(),
            request_id,
        }
    }

    pub fn error(
        message_type: impl Into<String>,
        error: impl Into<String>,
        request_id: Option<String>,
    ) -> Self {
        Self {
            message_type: message_type.into(),
            data: Value::Null,
            success: false,
            error: Some(error.into()),
            timestamp: Utc::now(),
            request_id,
        }
    }
}
