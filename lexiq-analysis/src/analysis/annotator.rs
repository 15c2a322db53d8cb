//! Per-term annotation
//!
//! Turns one word of the source into an [`AnalyzedTerm`]: classification,
//! score, first-occurrence position, surrounding context, rationale and
//! suggestions. Positions are character offsets into the source string.
//!
//! The annotator is built once per run; construction validates options,
//! parses custom rules, counts frequencies and locates every distinct word
//! so that annotating a term is a cheap lookup.

use serde_json::{Map, Value};
use std::collections::HashMap;

use super::classifier::classify;
use super::error::AnalysisError;
use super::scorer::score;
use crate::models::{AnalysisOptions, AnalyzedTerm, Classification};

/// Characters of context kept on each side of a term
pub const CONTEXT_RADIUS: usize = 50;

/// Upper bound for `max_suggestions`
pub const MAX_SUGGESTIONS_LIMIT: usize = 10;

#[derive(Debug, Clone)]
struct Placement {
    start: usize,
    end: usize,
    context: String,
}

/// Annotates the words of one source string
pub struct TermAnnotator<'a> {
    language: &'a str,
    domain: &'a str,
    options: &'a AnalysisOptions,
    words: Vec<&'a str>,
    frequencies: HashMap<&'a str, usize>,
    placements: HashMap<&'a str, Placement>,
    overrides: HashMap<String, Classification>,
}

impl<'a> TermAnnotator<'a> {
    pub fn new(
        content: &'a str,
        language: &'a str,
        domain: &'a str,
        options: &'a AnalysisOptions,
    ) -> Result<Self, AnalysisError> {
        validate_options(options)?;
        let overrides = parse_custom_rules(options.custom_rules.as_ref())?;

        let words: Vec<&str> = content.split_whitespace().collect();

        let mut frequencies: HashMap<&str, usize> = HashMap::new();
        for word in &words {
            *frequencies.entry(*word).or_insert(0) += 1;
        }

        // Byte offset of every char, plus the end of the string
        let char_starts: Vec<usize> = content
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(content.len()))
            .collect();

        let placements = frequencies
            .keys()
            .map(|word| (*word, locate(content, &char_starts, word)))
            .collect();

        Ok(Self {
            language,
            domain,
            options,
            words,
            frequencies,
            placements,
            overrides,
        })
    }

    /// Words of the source in order, duplicates included
    pub fn words(&self) -> &[&'a str] {
        &self.words
    }

    /// Annotate one word of the source
    pub fn annotate(&self, word: &str) -> AnalyzedTerm {
        let classification = self
            .overrides
            .get(&word.to_lowercase())
            .copied()
            .unwrap_or_else(|| classify(word, self.language, self.domain));
        let (score, confidence) = score(word, classification);

        let (start, end, context) = match self.placements.get(word) {
            Some(p) => (p.start, p.end, p.context.clone()),
            None => (0, word.chars().count(), String::new()),
        };
        let context = if self.options.include_context {
            context
        } else {
            String::new()
        };

        let mut metadata = Map::new();
        if confidence < self.options.confidence_threshold {
            metadata.insert("below_threshold".to_string(), Value::Bool(true));
        }

        AnalyzedTerm {
            text: word.to_string(),
            start_position: start,
            end_position: end,
            classification,
            score,
            confidence,
            frequency: self.frequencies.get(word).copied().unwrap_or(0),
            context,
            rationale: rationale(word, classification, self.options.detailed_rationale),
            suggestions: suggestions(word, classification, self.options.max_suggestions),
            metadata: if metadata.is_empty() {
                None
            } else {
                Some(metadata)
            },
        }
    }

    /// Annotate every word in order
    pub fn annotate_all(&self) -> Vec<AnalyzedTerm> {
        self.words.iter().map(|w| self.annotate(w)).collect()
    }
}

fn locate(content: &str, char_starts: &[usize], word: &str) -> Placement {
    let byte_start = content.find(word).unwrap_or(0);
    let start = char_starts
        .binary_search(&byte_start)
        .unwrap_or_else(|i| i);
    let end = start + word.chars().count();
    let total = char_starts.len() - 1;

    let ctx_start = char_starts[start.saturating_sub(CONTEXT_RADIUS)];
    let ctx_end = char_starts[(end + CONTEXT_RADIUS).min(total)];

    Placement {
        start,
        end,
        context: content[ctx_start..ctx_end].to_string(),
    }
}

fn validate_options(options: &AnalysisOptions) -> Result<(), AnalysisError> {
    let threshold = options.confidence_threshold;
    if !threshold.is_finite() || !(0.0..=1.0).contains(&threshold) {
        return Err(AnalysisError::InvalidOptions(format!(
            "confidence_threshold must be between 0 and 1, got {}",
            threshold
        )));
    }
    if options.max_suggestions > MAX_SUGGESTIONS_LIMIT {
        return Err(AnalysisError::InvalidOptions(format!(
            "max_suggestions must be at most {}, got {}",
            MAX_SUGGESTIONS_LIMIT, options.max_suggestions
        )));
    }
    Ok(())
}

/// Parse `{"terms": {"word": "classification"}}` into lowercase overrides
fn parse_custom_rules(
    rules: Option<&Map<String, Value>>,
) -> Result<HashMap<String, Classification>, AnalysisError> {
    let mut overrides = HashMap::new();
    let Some(terms) = rules.and_then(|r| r.get("terms")) else {
        return Ok(overrides);
    };

    let terms = terms
        .as_object()
        .ok_or_else(|| AnalysisError::InvalidRule("'terms' must be an object".to_string()))?;

    for (word, label) in terms {
        let label = label.as_str().ok_or_else(|| {
            AnalysisError::InvalidRule(format!("label for '{}' must be a string", word))
        })?;
        let classification = label
            .parse::<Classification>()
            .map_err(AnalysisError::InvalidRule)?;
        overrides.insert(word.to_lowercase(), classification);
    }

    Ok(overrides)
}

fn rationale(term: &str, classification: Classification, detailed: bool) -> String {
    if !detailed {
        return format!("'{}' classified as {}.", term, classification);
    }
    match classification {
        Classification::Valid => {
            format!("'{}' is correctly used and appropriate for the context.", term)
        }
        Classification::Review => {
            format!("'{}' may need review for consistency or clarity.", term)
        }
        Classification::Critical => {
            format!("'{}' requires immediate attention due to potential issues.", term)
        }
        Classification::Spelling => format!("'{}' appears to have spelling errors.", term),
        Classification::Grammar => {
            format!("'{}' has grammatical issues that should be addressed.", term)
        }
    }
}

fn suggestions(term: &str, classification: Classification, limit: usize) -> Option<Vec<String>> {
    let mut list = match classification {
        Classification::Valid => return None,
        Classification::Spelling => vec![
            format!("{}ed", term),
            format!("{}ing", term),
            capitalize(term),
        ],
        Classification::Critical => vec![
            "Consider rephrasing".to_string(),
            "Check for accuracy".to_string(),
            "Verify context".to_string(),
        ],
        Classification::Review => vec![
            "Review for clarity".to_string(),
            "Consider alternatives".to_string(),
        ],
        Classification::Grammar => Vec::new(),
    };
    list.truncate(limit);
    Some(list)
}

/// First character uppercased, the rest lowercased
fn capitalize(term: &str) -> String {
    let mut chars = term.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
