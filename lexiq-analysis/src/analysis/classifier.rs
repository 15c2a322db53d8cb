//! Term classifier

use crate::models::Classification;

/// Words always classified as valid
pub const STOP_WORDS: [&str; 8] = ["the", "and", "or", "but", "in", "on", "at", "to"];

/// Classify one term
///
/// Rules, first match wins:
/// 1. fewer than 2 characters → critical
/// 2. stop word (case-insensitive) → valid
/// 3. contains a decimal digit (0-9) → review
/// 4. not purely alphabetic → spelling
/// 5. otherwise → valid
///
/// `language` and `domain` are extension points; the placeholder rules do
/// not depend on them.
pub fn classify(term: &str, _language: &str, _domain: &str) -> Classification {
    if term.chars().count() < 2 {
        return Classification::Critical;
    }

    let lower = term.to_lowercase();
    if STOP_WORDS.contains(&lower.as_str()) {
        return Classification::Valid;
    }

    if term.chars().any(|ch| ch.is_ascii_digit()) {
        return Classification::Review;
    }

    if !term.chars().all(char::is_alphabetic) {
        return Classification::Spelling;
    }

    Classification::Valid
}
