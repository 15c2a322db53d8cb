//! Lightweight realtime summary for WebSocket clients

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Quick content summary, no per-term analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RealtimeSummary {
    pub word_count: usize,
    pub character_count: usize,
    /// `min(1, word_count / 100)`
    pub estimated_quality: f64,
    pub language: String,
    pub domain: String,
    pub timestamp: DateTime<Utc>,
}

pub fn analyze_realtime(content: &str, language: &str, domain: &str) -> RealtimeSummary {
    let word_count = content.split_whitespace().count();
    RealtimeSummary {
        word_count,
        character_count: content.chars().count(),
        estimated_quality: (word_count as f64 / 100.0).min(1.0),
        language: language.to_string(),
        domain: domain.to_string(),
        timestamp: Utc::now(),
    }
}
