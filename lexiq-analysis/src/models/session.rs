//! User session model

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Session lifetime
pub const SESSION_LIFETIME_HOURS: i64 = 24;

/// One login session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSession {
    pub session_id: String,
    pub user_id: String,
    pub language: String,
    pub domain: String,
    pub created_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
    pub preferences: Option<Map<String, Value>>,
    pub project_id: Option<String>,
    pub expires_at: DateTime<Utc>,
}

impl UserSession {
    pub fn new(user_id: impl Into<String>, language: impl Into<String>, domain: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            session_id: Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            language: language.into(),
            domain: domain.into(),
            created_at: now,
            last_activity: now,
            preferences: None,
            project_id: None,
            expires_at: now + Duration::hours(SESSION_LIFETIME_HOURS),
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}
