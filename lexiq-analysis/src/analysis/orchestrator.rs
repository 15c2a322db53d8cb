//! Analysis orchestrator
//!
//! Drives one run through `processing → {completed | failed}`, updating the
//! request registry and publishing lifecycle events as it goes. Progress
//! moves 0 → 25 → 75 → 100.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use tracing::{debug, error, info};
use uuid::Uuid;

use lexiq_common::events::{AnalysisEvent, EventBus};
use lexiq_common::Service;

use super::annotator::TermAnnotator;
use super::error::AnalysisError;
use super::registry::{RequestRegistry, RequestStatus};
use super::statistics::aggregate;
use crate::models::{AnalysisOptions, AnalysisRequest, AnalysisResponse, AnalysisStatus, AnalyzedTerm};

/// Terms annotated between cooperative yields
const ANNOTATION_CHUNK: usize = 256;

/// Runs analyses and tracks them in the registry
pub struct AnalysisService {
    registry: RequestRegistry,
    event_bus: EventBus,
    running: AtomicBool,
}

impl AnalysisService {
    pub fn new(registry: RequestRegistry, event_bus: EventBus) -> Self {
        Self {
            registry,
            event_bus,
            running: AtomicBool::new(false),
        }
    }

    pub fn registry(&self) -> &RequestRegistry {
        &self.registry
    }

    /// Analyze a validated request, carrying its metadata into the response
    pub async fn analyze(&self, request: AnalysisRequest) -> Result<AnalysisResponse, AnalysisError> {
        let mut response = self
            .run(
                &request.content,
                &request.language,
                &request.domain,
                request.options.as_ref(),
            )
            .await?;
        response.metadata = request.metadata;
        Ok(response)
    }

    /// Execute one analysis run
    ///
    /// A registry entry exists from the moment the run starts; on error it
    /// is marked failed and the error is returned.
    pub async fn run(
        &self,
        content: &str,
        language: &str,
        domain: &str,
        options: Option<&AnalysisOptions>,
    ) -> Result<AnalysisResponse, AnalysisError> {
        let started = Instant::now();
        let request_id = Uuid::new_v4().to_string();

        self.registry.register(&request_id);
        self.event_bus.emit_lossy(AnalysisEvent::AnalysisStarted {
            request_id: request_id.clone(),
            language: language.to_string(),
            domain: domain.to_string(),
            timestamp: Utc::now(),
        });
        debug!(request_id = %request_id, "Analysis started");

        match self
            .execute(&request_id, content, language, domain, options, started)
            .await
        {
            Ok(response) => {
                self.registry.complete(&request_id, response.clone());
                self.event_bus.emit_lossy(AnalysisEvent::AnalysisCompleted {
                    request_id: request_id.clone(),
                    total_terms: response.statistics.total_terms,
                    quality_score: response.statistics.quality_score,
                    processing_time: response.statistics.processing_time,
                    timestamp: Utc::now(),
                });
                info!(
                    request_id = %request_id,
                    terms = response.statistics.total_terms,
                    "Analysis completed in {:.3}s",
                    response.statistics.processing_time
                );
                Ok(response)
            }
            Err(e) => {
                error!(request_id = %request_id, "Analysis failed: {}", e);
                self.registry.fail(&request_id, &e.to_string());
                self.event_bus.emit_lossy(AnalysisEvent::AnalysisFailed {
                    request_id,
                    error: e.to_string(),
                    timestamp: Utc::now(),
                });
                Err(e)
            }
        }
    }

    /// Snapshot of a run; never fails
    pub fn get_status(&self, request_id: &str) -> RequestStatus {
        self.registry.get_status(request_id)
    }

    async fn execute(
        &self,
        request_id: &str,
        content: &str,
        language: &str,
        domain: &str,
        options: Option<&AnalysisOptions>,
        started: Instant,
    ) -> Result<AnalysisResponse, AnalysisError> {
        self.progress(request_id, 25);

        let defaults = AnalysisOptions::default();
        let options = options.unwrap_or(&defaults);
        let terms = annotate_cooperatively(content, language, domain, options).await?;
        self.progress(request_id, 75);

        let statistics = aggregate(&terms, started.elapsed().as_secs_f64());
        self.progress(request_id, 100);

        Ok(AnalysisResponse {
            terms,
            statistics,
            status: AnalysisStatus::Completed,
            request_id: request_id.to_string(),
            language: language.to_string(),
            domain: domain.to_string(),
            created_at: Utc::now(),
            metadata: None,
        })
    }

    fn progress(&self, request_id: &str, progress: u8) {
        self.registry.set_progress(request_id, progress);
        self.event_bus.emit_lossy(AnalysisEvent::AnalysisProgress {
            request_id: request_id.to_string(),
            progress,
            timestamp: Utc::now(),
        });
    }
}

async fn annotate_cooperatively(
    content: &str,
    language: &str,
    domain: &str,
    options: &AnalysisOptions,
) -> Result<Vec<AnalyzedTerm>, AnalysisError> {
    let annotator = TermAnnotator::new(content, language, domain, options)?;
    let mut terms = Vec::with_capacity(annotator.words().len());
    for chunk in annotator.words().chunks(ANNOTATION_CHUNK) {
        terms.extend(chunk.iter().map(|word| annotator.annotate(word)));
        tokio::task::yield_now().await;
    }
    Ok(terms)
}

#[async_trait]
impl Service for AnalysisService {
    fn name(&self) -> &'static str {
        "analysis"
    }

    async fn start(&self) -> lexiq_common::Result<()> {
        self.running.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn stop(&self) -> lexiq_common::Result<()> {
        self.running.store(false, Ordering::SeqCst);
        Ok(())
    }

    async fn is_healthy(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}
