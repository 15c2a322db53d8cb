//! Analysis error types

use thiserror::Error;

/// Input rejected before a run starts; no registry entry is created
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Failure inside a run; the registry entry transitions to `failed`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    /// Option value outside its allowed range
    #[error("Invalid analysis options: {0}")]
    InvalidOptions(String),

    /// Malformed `custom_rules` entry
    #[error("Invalid custom rule: {0}")]
    InvalidRule(String),
}
