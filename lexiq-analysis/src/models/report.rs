//! Report models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Output format of a generated report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Json,
    Csv,
    Html,
    Pdf,
    Xlsx,
}

impl ReportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Json => "json",
            ReportFormat::Csv => "csv",
            ReportFormat::Html => "html",
            ReportFormat::Pdf => "pdf",
            ReportFormat::Xlsx => "xlsx",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ReportFormat::Json => "application/json",
            ReportFormat::Csv => "text/csv; charset=utf-8",
            ReportFormat::Html => "text/html; charset=utf-8",
            ReportFormat::Pdf => "application/pdf",
            ReportFormat::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
        }
    }

    /// Formats the renderer can produce
    pub fn is_renderable(&self) -> bool {
        matches!(self, ReportFormat::Json | ReportFormat::Csv | ReportFormat::Html)
    }
}

fn default_true() -> bool {
    true
}

/// Report request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    pub format: ReportFormat,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_true")]
    pub include_statistics: bool,
    #[serde(default = "default_true")]
    pub include_terms: bool,
    #[serde(default)]
    pub include_charts: bool,
    /// Optional `start`/`end` bounds on analysis timestamps
    #[serde(default)]
    pub date_range: Option<HashMap<String, DateTime<Utc>>>,
    #[serde(default)]
    pub filters: Option<Map<String, Value>>,
}

/// Stored report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedReport {
    pub report_id: String,
    pub user_id: String,
    pub config: ReportConfig,
    pub file_name: String,
    pub file_size: u64,
    pub download_url: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub download_count: u64,
    #[serde(skip)]
    pub body: String,
}
