//! Term scorer

use crate::models::Classification;

/// Base quality score per classification
pub fn base_score(classification: Classification) -> f64 {
    match classification {
        Classification::Valid => 0.90,
        Classification::Review => 0.60,
        Classification::Critical => 0.30,
        Classification::Spelling => 0.20,
        Classification::Grammar => 0.40,
    }
}

/// Score a classified term, returning `(score, confidence)`
///
/// `score = min(1, base + 0.1 * min(1, chars / 10))`,
/// `confidence = clamp(score + 0.1, 0.1, 0.9)`.
pub fn score(term: &str, classification: Classification) -> (f64, f64) {
    let length_factor = (term.chars().count() as f64 / 10.0).min(1.0);
    let score = (base_score(classification) + length_factor * 0.1).min(1.0);
    let confidence = (score + 0.1).clamp(0.1, 0.9);
    (score, confidence)
}
