//! Feedback models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::analysis::ValidationError;

/// Client-supplied feedback
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackData {
    pub feedback_type: String,
    pub content: String,
    /// 1-5 when present
    #[serde(default)]
    pub rating: Option<u8>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub context: Option<Map<String, Value>>,
    #[serde(default)]
    pub anonymous: bool,
}

impl FeedbackData {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let len = self.content.chars().count();
        if len == 0 || len > 1000 {
            return Err(ValidationError::new(
                "Feedback content must be between 1 and 1000 characters",
            ));
        }
        if let Some(rating) = self.rating {
            if !(1..=5).contains(&rating) {
                return Err(ValidationError::new("Rating must be between 1 and 5"));
            }
        }
        Ok(())
    }
}

/// Stored feedback
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub feedback_id: String,
    /// None for anonymous feedback
    pub user_id: Option<String>,
    #[serde(flatten)]
    pub data: FeedbackData,
    pub created_at: DateTime<Utc>,
    pub status: String,
    pub response: Option<String>,
}

/// Acknowledgement returned on submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackReceipt {
    pub feedback_id: String,
    pub status: String,
    pub message: String,
}
