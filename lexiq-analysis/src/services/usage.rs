//! Per-user usage statistics
//!
//! Updated after every completed analysis; read by `/api/statistics` and
//! the report renderer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use lexiq_common::{InMemoryStore, Store};

use crate::models::AnalysisResponse;

/// Recent summaries kept per user
pub const RECENT_ANALYSES_LIMIT: usize = 100;

/// One completed analysis, without its terms
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub request_id: String,
    pub language: String,
    pub domain: String,
    pub total_terms: usize,
    pub quality_score: f64,
    pub processing_time: f64,
    pub created_at: DateTime<Utc>,
}

impl From<&AnalysisResponse> for AnalysisSummary {
    fn from(response: &AnalysisResponse) -> Self {
        Self {
            request_id: response.request_id.clone(),
            language: response.language.clone(),
            domain: response.domain.clone(),
            total_terms: response.statistics.total_terms,
            quality_score: response.statistics.quality_score,
            processing_time: response.statistics.processing_time,
            created_at: response.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageStatistics {
    pub user_id: String,
    pub total_analyses: u64,
    pub total_terms_analyzed: u64,
    pub average_quality_score: f64,
    pub most_used_language: Option<String>,
    pub most_used_domain: Option<String>,
    pub last_analysis: Option<DateTime<Utc>>,
    pub language_counts: BTreeMap<String, u64>,
    pub domain_counts: BTreeMap<String, u64>,
    /// Newest last, at most [`RECENT_ANALYSES_LIMIT`]
    pub recent_analyses: Vec<AnalysisSummary>,
}

impl UsageStatistics {
    pub fn empty(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            total_analyses: 0,
            total_terms_analyzed: 0,
            average_quality_score: 0.0,
            most_used_language: None,
            most_used_domain: None,
            last_analysis: None,
            language_counts: BTreeMap::new(),
            domain_counts: BTreeMap::new(),
            recent_analyses: Vec::new(),
        }
    }

    fn record(&mut self, summary: AnalysisSummary) {
        self.total_analyses += 1;
        self.total_terms_analyzed += summary.total_terms as u64;

        let n = self.total_analyses as f64;
        self.average_quality_score += (summary.quality_score - self.average_quality_score) / n;

        *self.language_counts.entry(summary.language.clone()).or_insert(0) += 1;
        *self.domain_counts.entry(summary.domain.clone()).or_insert(0) += 1;
        self.most_used_language = most_used(&self.language_counts);
        self.most_used_domain = most_used(&self.domain_counts);

        self.last_analysis = Some(summary.created_at);
        self.recent_analyses.push(summary);
        if self.recent_analyses.len() > RECENT_ANALYSES_LIMIT {
            let excess = self.recent_analyses.len() - RECENT_ANALYSES_LIMIT;
            self.recent_analyses.drain(..excess);
        }
    }
}

/// Highest count; ties go to the alphabetically first key
fn most_used(counts: &BTreeMap<String, u64>) -> Option<String> {
    counts
        .iter()
        .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
        .map(|(key, _)| key.clone())
}

pub struct UsageTracker {
    store: Arc<dyn Store<String, UsageStatistics>>,
}

impl Default for UsageTracker {
    fn default() -> Self {
        Self::new(Arc::new(InMemoryStore::new()))
    }
}

impl UsageTracker {
    pub fn new(store: Arc<dyn Store<String, UsageStatistics>>) -> Self {
        Self { store }
    }

    pub fn record(&self, user_id: &str, response: &AnalysisResponse) {
        let mut summary = Some(AnalysisSummary::from(response));
        let updated = self.store.update(&user_id.to_string(), &mut |stats: &mut UsageStatistics| {
            if let Some(summary) = summary.take() {
                stats.record(summary);
            }
        });

        if !updated {
            if let Some(summary) = summary {
                let mut stats = UsageStatistics::empty(user_id);
                stats.record(summary);
                self.store.put(user_id.to_string(), stats);
            }
        }
    }

    /// Statistics for a user; all-zero when nothing was recorded
    pub fn statistics(&self, user_id: &str) -> UsageStatistics {
        self.store
            .get(&user_id.to_string())
            .unwrap_or_else(|| UsageStatistics::empty(user_id))
    }
}
