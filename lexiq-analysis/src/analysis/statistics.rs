//! Statistics aggregation

use crate::models::{AnalysisStatistics, AnalyzedTerm, Classification};

/// Aggregate a term sequence into summary statistics
///
/// An empty sequence yields all-zero statistics. `elapsed` is the run's
/// wall-clock time in seconds and is copied into `processing_time`.
pub fn aggregate(terms: &[AnalyzedTerm], elapsed: f64) -> AnalysisStatistics {
    let count = |c: Classification| terms.iter().filter(|t| t.classification == c).count();

    if terms.is_empty() {
        return AnalysisStatistics {
            total_terms: 0,
            valid_terms: 0,
            review_terms: 0,
            critical_terms: 0,
            spelling_errors: 0,
            grammar_errors: 0,
            quality_score: 0.0,
            confidence_min: 0.0,
            confidence_max: 0.0,
            confidence_avg: 0.0,
            coverage: 1.0,
            processing_time: elapsed,
        };
    }

    let n = terms.len() as f64;
    let quality_score = terms.iter().map(|t| t.score).sum::<f64>() / n;

    let (min, max, sum) = terms.iter().fold(
        (f64::INFINITY, f64::NEG_INFINITY, 0.0),
        |(min, max, sum), t| (min.min(t.confidence), max.max(t.confidence), sum + t.confidence),
    );
    // Summation rounding must not push the mean outside [min, max]
    let avg = (sum / n).clamp(min, max);

    AnalysisStatistics {
        total_terms: terms.len(),
        valid_terms: count(Classification::Valid),
        review_terms: count(Classification::Review),
        critical_terms: count(Classification::Critical),
        spelling_errors: count(Classification::Spelling),
        grammar_errors: count(Classification::Grammar),
        quality_score,
        confidence_min: min,
        confidence_max: max,
        confidence_avg: avg,
        coverage: 1.0,
        processing_time: elapsed,
    }
}
