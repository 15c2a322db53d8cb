//! Analysis request/response models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::analysis::ValidationError;

/// Languages accepted by the analysis endpoints
pub const ALLOWED_LANGUAGES: &[&str] = &["en", "es", "fr", "de", "it", "pt", "ja", "zh", "ko"];

/// Maximum content length in characters
pub const MAX_CONTENT_CHARS: usize = 100_000;

/// Analysis run status
///
/// `Pending → Processing → {Completed | Failed}`; no transition back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl AnalysisStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, AnalysisStatus::Completed | AnalysisStatus::Failed)
    }
}

/// Quality label assigned to a term
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    Valid,
    Review,
    Critical,
    Spelling,
    Grammar,
}

impl Classification {
    pub const ALL: [Classification; 5] = [
        Classification::Valid,
        Classification::Review,
        Classification::Critical,
        Classification::Spelling,
        Classification::Grammar,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::Valid => "valid",
            Classification::Review => "review",
            Classification::Critical => "critical",
            Classification::Spelling => "spelling",
            Classification::Grammar => "grammar",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Classification {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Classification::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("unknown classification '{}'", s))
    }
}

/// One classified token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzedTerm {
    pub text: String,
    /// Character offset of the first occurrence in the source
    pub start_position: usize,
    pub end_position: usize,
    pub classification: Classification,
    pub score: f64,
    pub confidence: f64,
    /// Exact-match count of this token in the word sequence
    pub frequency: usize,
    pub context: String,
    pub rationale: String,
    pub suggestions: Option<Vec<String>>,
    pub metadata: Option<Map<String, Value>>,
}

/// Aggregate over one term sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisStatistics {
    pub total_terms: usize,
    pub valid_terms: usize,
    pub review_terms: usize,
    pub critical_terms: usize,
    pub spelling_errors: usize,
    pub grammar_errors: usize,
    pub quality_score: f64,
    pub confidence_min: f64,
    pub confidence_max: f64,
    pub confidence_avg: f64,
    pub coverage: f64,
    /// Wall-clock seconds for the run
    pub processing_time: f64,
}

/// Tuning knobs for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisOptions {
    pub include_spelling_check: bool,
    pub include_grammar_check: bool,
    /// Terms with lower confidence are flagged in their metadata
    pub confidence_threshold: f64,
    /// Per-term suggestion cap (0-10)
    pub max_suggestions: usize,
    pub include_context: bool,
    pub detailed_rationale: bool,
    /// `{"terms": {"<lowercase word>": "<classification>"}}`
    pub custom_rules: Option<Map<String, Value>>,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            include_spelling_check: true,
            include_grammar_check: false,
            confidence_threshold: 0.5,
            max_suggestions: 3,
            include_context: true,
            detailed_rationale: true,
            custom_rules: None,
        }
    }
}

fn default_language() -> String {
    "en".to_string()
}

fn default_domain() -> String {
    "general".to_string()
}

/// Analysis request body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub content: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_domain")]
    pub domain: String,
    #[serde(default)]
    pub options: Option<AnalysisOptions>,
    /// Accepted for compatibility; not used by the heuristics
    #[serde(default)]
    pub reference_text: Option<String>,
    #[serde(default)]
    pub metadata: Option<Map<String, Value>>,
}

impl AnalysisRequest {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            language: default_language(),
            domain: default_domain(),
            options: None,
            reference_text: None,
            metadata: None,
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = domain.into();
        self
    }

    pub fn with_options(mut self, options: AnalysisOptions) -> Self {
        self.options = Some(options);
        self
    }

    /// Check content and language, returning the request with trimmed content
    pub fn validate(mut self) -> Result<Self, ValidationError> {
        if self.content.chars().count() > MAX_CONTENT_CHARS {
            return Err(ValidationError::new(format!(
                "Content exceeds maximum length of {} characters",
                MAX_CONTENT_CHARS
            )));
        }

        let trimmed = self.content.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::new("Content cannot be empty"));
        }
        if trimmed.len() != self.content.len() {
            self.content = trimmed.to_string();
        }

        if !ALLOWED_LANGUAGES.contains(&self.language.as_str()) {
            return Err(ValidationError::new(format!(
                "Language must be one of: {}",
                ALLOWED_LANGUAGES.join(", ")
            )));
        }

        Ok(self)
    }
}

/// Result of one completed run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub terms: Vec<AnalyzedTerm>,
    pub statistics: AnalysisStatistics,
    pub status: AnalysisStatus,
    pub request_id: String,
    pub language: String,
    pub domain: String,
    pub created_at: DateTime<Utc>,
    pub metadata: Option<Map<String, Value>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_round_trips_through_str() {
        for c in Classification::ALL {
            assert_eq!(c.as_str().parse::<Classification>().unwrap(), c);
        }
        assert!("excellent".parse::<Classification>().is_err());
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_value(AnalysisStatus::Processing).unwrap(),
            "processing"
        );
        assert!(AnalysisStatus::Failed.is_terminal());
        assert!(!AnalysisStatus::Pending.is_terminal());
    }

    #[test]
    fn test_request_defaults_from_json() {
        let request: AnalysisRequest = serde_json::from_str(r#"{"content": "hello"}"#).unwrap();
        assert_eq!(request.language, "en");
        assert_eq!(request.domain, "general");
        assert!(request.options.is_none());
    }

    #[test]
    fn test_options_defaults_from_partial_json() {
        let options: AnalysisOptions =
            serde_json::from_str(r#"{"max_suggestions": 1}"#).unwrap();
        assert_eq!(options.max_suggestions, 1);
        assert!(options.include_spelling_check);
        assert!(!options.include_grammar_check);
        assert_eq!(options.confidence_threshold, 0.5);
    }

    #[test]
    fn test_validate_trims_content() {
        let request = AnalysisRequest::new("  the cat \n").validate().unwrap();
        assert_eq!(request.content, "the cat");
    }

    #[test]
    fn test_validate_rejects_blank_content() {
        let err = AnalysisRequest::new("   \t\n").validate().unwrap_err();
        assert_eq!(err.to_string(), "Content cannot be empty");
        assert!(AnalysisRequest::new("").validate().is_err());
    }

    #[test]
    fn test_validate_rejects_unknown_language() {
        let err = AnalysisRequest::new("hello")
            .with_language("xx")
            .validate()
            .unwrap_err();
        assert!(err.to_string().starts_with("Language must be one of"));
    }

    #[test]
    fn test_validate_rejects_oversized_content() {
        let content = "a".repeat(MAX_CONTENT_CHARS + 1);
        assert!(AnalysisRequest::new(content).validate().is_err());

        let content = "a".repeat(MAX_CONTENT_CHARS);
        assert!(AnalysisRequest::new(content).validate().is_ok());
    }
}
