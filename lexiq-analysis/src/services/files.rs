//! File ingestion
//!
//! Uploaded bytes are checksummed, written under the upload directory as
//! `<file_id><ext>`, and reduced to text for analysis. Plain text and JSON
//! are extracted; other accepted types get a placeholder body.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use lexiq_common::config::ensure_directory_exists;
use lexiq_common::{InMemoryStore, Service, Store};

use crate::models::{FileMetadata, ProcessedFile};

/// MIME types accepted for upload
pub const ALLOWED_MIME_TYPES: &[&str] = &[
    "text/plain",
    "text/csv",
    "application/json",
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

#[derive(Debug, Error)]
pub enum FileError {
    #[error("File size exceeds maximum allowed size of {max} bytes")]
    TooLarge { size: u64, max: u64 },

    #[error("File type '{0}' is not supported")]
    UnsupportedType(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("File storage error: {0}")]
    Io(#[from] std::io::Error),
}

/// One uploaded file as received from the client
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub filename: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
    pub project_id: Option<String>,
}

pub struct FileProcessingService {
    upload_dir: PathBuf,
    max_file_size: u64,
    store: Arc<dyn Store<String, ProcessedFile>>,
    running: AtomicBool,
}

impl FileProcessingService {
    pub fn new(upload_dir: PathBuf, max_file_size: u64) -> Self {
        Self::with_store(upload_dir, max_file_size, Arc::new(InMemoryStore::new()))
    }

    pub fn with_store(
        upload_dir: PathBuf,
        max_file_size: u64,
        store: Arc<dyn Store<String, ProcessedFile>>,
    ) -> Self {
        Self {
            upload_dir,
            max_file_size,
            store,
            running: AtomicBool::new(false),
        }
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    pub fn max_file_size(&self) -> u64 {
        self.max_file_size
    }

    /// Validate, persist and extract an upload
    pub async fn process_upload(
        &self,
        user_id: &str,
        upload: FileUpload,
    ) -> Result<ProcessedFile, FileError> {
        let started = Instant::now();

        let size = upload.bytes.len() as u64;
        if size > self.max_file_size {
            return Err(FileError::TooLarge {
                size,
                max: self.max_file_size,
            });
        }
        if !ALLOWED_MIME_TYPES.contains(&upload.mime_type.as_str()) {
            return Err(FileError::UnsupportedType(upload.mime_type));
        }

        let file_id = Uuid::new_v4().to_string();
        let extension = Path::new(&upload.filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{}", e))
            .unwrap_or_default();
        let path = self.upload_dir.join(format!("{}{}", file_id, extension));

        let checksum = format!("{:x}", Sha256::digest(&upload.bytes));
        tokio::fs::write(&path, &upload.bytes).await?;

        let content = extract_text(&upload.mime_type, &upload.bytes);
        let line_count = if content.is_empty() {
            0
        } else {
            content.matches('\n').count() + 1
        };

        let processed = ProcessedFile {
            file: FileMetadata {
                file_id: file_id.clone(),
                filename: upload.filename,
                file_type: extension,
                file_size: size,
                mime_type: upload.mime_type,
                checksum,
                uploaded_at: Utc::now(),
                user_id: user_id.to_string(),
                project_id: upload.project_id,
            },
            character_count: content.chars().count(),
            word_count: content.split_whitespace().count(),
            line_count,
            content: Some(content),
            language_detected: None,
            processing_status: "completed".to_string(),
            processing_time: started.elapsed().as_secs_f64(),
            metadata: None,
        };

        info!(
            file_id = %file_id,
            size,
            "Stored upload {}",
            path.display()
        );
        self.store.put(file_id, processed.clone());
        Ok(processed)
    }

    /// A file, only if owned by `user_id`
    pub fn get(&self, user_id: &str, file_id: &str) -> Option<ProcessedFile> {
        self.store
            .get(&file_id.to_string())
            .filter(|f| f.file.user_id == user_id)
    }

    /// Delete a file record and its stored bytes
    pub async fn delete(&self, user_id: &str, file_id: &str) -> Result<(), FileError> {
        let file = self
            .get(user_id, file_id)
            .ok_or_else(|| FileError::NotFound(file_id.to_string()))?;

        // Bytes first: on failure the record stays and the delete can be retried
        let path = self
            .upload_dir
            .join(format!("{}{}", file.file.file_id, file.file.file_type));
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("Stored bytes for {} already missing", file_id);
            }
            Err(e) => return Err(e.into()),
        }

        self.store.delete(&file_id.to_string());
        Ok(())
    }
}

/// Text used for analysis; empty when extraction fails
pub fn extract_text(mime_type: &str, bytes: &[u8]) -> String {
    match mime_type {
        "text/plain" => match std::str::from_utf8(bytes) {
            Ok(text) => text.to_string(),
            Err(e) => {
                warn!("Upload is not valid UTF-8: {}", e);
                String::new()
            }
        },
        "application/json" => match serde_json::from_slice::<Value>(bytes)
            .and_then(|v| serde_json::to_string_pretty(&v))
        {
            Ok(text) => text,
            Err(e) => {
                warn!("Upload is not valid JSON: {}", e);
                String::new()
            }
        },
        other => format!("Content extracted from {} file", other),
    }
}

#[async_trait]
impl Service for FileProcessingService {
    fn name(&self) -> &'static str {
        "file_processing"
    }

    async fn start(&self) -> lexiq_common::Result<()> {
        ensure_directory_exists(&self.upload_dir)?;
        self.running.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn stop(&self) -> lexiq_common::Result<()> {
        self.running.store(false, Ordering::SeqCst);
        Ok(())
    }

    async fn is_healthy(&self) -> bool {
        self.running.load(Ordering::SeqCst) && self.upload_dir.is_dir()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn upload(filename: &str, mime: &str, bytes: &[u8]) -> FileUpload {
        FileUpload {
            filename: filename.to_string(),
            mime_type: mime.to_string(),
            bytes: bytes.to_vec(),
            project_id: None,
        }
    }

    async fn started_service(dir: &TempDir, max: u64) -> FileProcessingService {
        let service = FileProcessingService::new(dir.path().join("uploads"), max);
        service.start().await.unwrap();
        service
    }

    #[tokio::test]
    async fn test_plain_text_upload() {
        let dir = TempDir::new().unwrap();
        let service = started_service(&dir, 1024).await;

        let file = service
            .process_upload("u1", upload("notes.txt", "text/plain", b"the cat\nsat down"))
            .await
            .unwrap();

        assert_eq!(file.file.file_type, ".txt");
        assert_eq!(file.file.file_size, 16);
        assert_eq!(file.content.as_deref(), Some("the cat\nsat down"));
        assert_eq!(file.word_count, 4);
        assert_eq!(file.line_count, 2);
        assert_eq!(file.character_count, 16);
        assert_eq!(file.file.checksum.len(), 64);

        let stored = dir
            .path()
            .join("uploads")
            .join(format!("{}.txt", file.file.file_id));
        assert_eq!(std::fs::read(stored).unwrap(), b"the cat\nsat down");
    }

    #[tokio::test]
    async fn test_checksum_is_sha256() {
        let dir = TempDir::new().unwrap();
        let service = started_service(&dir, 1024).await;
        let file = service
            .process_upload("u1", upload("abc.txt", "text/plain", b"abc"))
            .await
            .unwrap();
        assert_eq!(
            file.file.checksum,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[tokio::test]
    async fn test_json_is_pretty_printed() {
        let dir = TempDir::new().unwrap();
        let service = started_service(&dir, 1024).await;
        let file = service
            .process_upload("u1", upload("data.json", "application/json", br#"{"a":1}"#))
            .await
            .unwrap();
        assert_eq!(file.content.as_deref(), Some("{\n  \"a\": 1\n}"));
        assert_eq!(file.line_count, 3);
    }

    #[tokio::test]
    async fn test_other_types_get_placeholder() {
        let dir = TempDir::new().unwrap();
        let service = started_service(&dir, 1024).await;
        let file = service
            .process_upload("u1", upload("doc.pdf", "application/pdf", b"%PDF-1.4"))
            .await
            .unwrap();
        assert_eq!(
            file.content.as_deref(),
            Some("Content extracted from application/pdf file")
        );
    }

    #[tokio::test]
    async fn test_rejects_oversized_and_unsupported() {
        let dir = TempDir::new().unwrap();
        let service = started_service(&dir, 4).await;

        let err = service
            .process_upload("u1", upload("big.txt", "text/plain", b"12345"))
            .await
            .unwrap_err();
        assert!(matches!(err, FileError::TooLarge { size: 5, max: 4 }));

        let err = service
            .process_upload("u1", upload("x.png", "image/png", b"1"))
            .await
            .unwrap_err();
        assert!(matches!(err, FileError::UnsupportedType(_)));
    }

    #[tokio::test]
    async fn test_get_and_delete_scoped_to_owner() {
        let dir = TempDir::new().unwrap();
        let service = started_service(&dir, 1024).await;
        let file = service
            .process_upload("u1", upload("a.txt", "text/plain", b"hello"))
            .await
            .unwrap();
        let id = file.file.file_id.clone();

        assert!(service.get("u1", &id).is_some());
        assert!(service.get("u2", &id).is_none());
        assert!(matches!(
            service.delete("u2", &id).await,
            Err(FileError::NotFound(_))
        ));

        service.delete("u1", &id).await.unwrap();
        assert!(service.get("u1", &id).is_none());
        assert!(!dir.path().join("uploads").join(format!("{}.txt", id)).exists());
    }

    #[tokio::test]
    async fn test_failed_removal_keeps_record() {
        let dir = TempDir::new().unwrap();
        let service = started_service(&dir, 1024).await;
        let file = service
            .process_upload("u1", upload("a.txt", "text/plain", b"hello"))
            .await
            .unwrap();
        let id = file.file.file_id.clone();

        // A directory in place of the stored bytes makes removal fail
        let stored = dir.path().join("uploads").join(format!("{}.txt", id));
        std::fs::remove_file(&stored).unwrap();
        std::fs::create_dir(&stored).unwrap();

        assert!(matches!(service.delete("u1", &id).await, Err(FileError::Io(_))));
        assert!(service.get("u1", &id).is_some());

        std::fs::remove_dir(&stored).unwrap();
        service.delete("u1", &id).await.unwrap();
        assert!(service.get("u1", &id).is_none());
    }

    #[tokio::test]
    async fn test_health_follows_lifecycle() {
        let dir = TempDir::new().unwrap();
        let service = FileProcessingService::new(dir.path().join("uploads"), 1024);
        assert!(!service.is_healthy().await);
        service.start().await.unwrap();
        assert!(service.is_healthy().await);
        service.stop().await.unwrap();
        assert!(!service.is_healthy().await);
    }

    #[test]
    fn test_invalid_utf8_extracts_empty() {
        assert_eq!(extract_text("text/plain", &[0xff, 0xfe]), "");
        assert_eq!(extract_text("application/json", b"{not json"), "");
    }
}
