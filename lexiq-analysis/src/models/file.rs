//! Uploaded file models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Metadata recorded for every upload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileMetadata {
    pub file_id: String,
    /// Original filename
    pub filename: String,
    /// Extension including the dot (may be empty)
    pub file_type: String,
    pub file_size: u64,
    pub mime_type: String,
    /// SHA-256 of the uploaded bytes, hex encoded
    pub checksum: String,
    pub uploaded_at: DateTime<Utc>,
    pub user_id: String,
    pub project_id: Option<String>,
}

/// Upload after text extraction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedFile {
    #[serde(flatten)]
    pub file: FileMetadata,
    pub content: Option<String>,
    pub character_count: usize,
    pub word_count: usize,
    pub line_count: usize,
    pub language_detected: Option<String>,
    pub processing_status: String,
    pub processing_time: f64,
    pub metadata: Option<Map<String, Value>>,
}
