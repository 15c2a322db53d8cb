//! Per-user configuration model

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::AnalysisOptions;

/// User configuration (defaults apply until the user saves one)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigurationData {
    pub language: String,
    pub domain: String,
    pub analysis_options: Option<AnalysisOptions>,
    pub ui_preferences: Option<Map<String, Value>>,
    pub notification_settings: Option<Map<String, Value>>,
    pub api_settings: Option<Map<String, Value>>,
}

impl Default for ConfigurationData {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            domain: "general".to_string(),
            analysis_options: None,
            ui_preferences: None,
            notification_settings: None,
            api_settings: None,
        }
    }
}
