//! Project models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::analysis::ValidationError;

fn default_language() -> String {
    "en".to_string()
}

fn default_domain() -> String {
    "general".to_string()
}

/// Client-supplied project fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectData {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_domain")]
    pub domain: String,
    #[serde(default)]
    pub settings: Option<Map<String, Value>>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub is_public: bool,
}

impl ProjectData {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let name_len = self.name.chars().count();
        if name_len == 0 || name_len > 100 {
            return Err(ValidationError::new(
                "Project name must be between 1 and 100 characters",
            ));
        }
        if let Some(description) = &self.description {
            if description.chars().count() > 500 {
                return Err(ValidationError::new(
                    "Project description cannot exceed 500 characters",
                ));
            }
        }
        Ok(())
    }
}

/// Stored project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub project_id: String,
    pub user_id: String,
    #[serde(flatten)]
    pub data: ProjectData,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub analysis_count: u64,
    pub file_count: u64,
    pub status: String,
}
