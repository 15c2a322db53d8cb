//! Event types for the LexiQ event system
//!
//! Provides the AnalysisEvent enum and the EventBus used to fan analysis
//! lifecycle updates out to SSE subscribers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Analysis lifecycle events
///
/// Serialized with a `type` tag for SSE transmission.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum AnalysisEvent {
    /// A run was registered and began processing
    AnalysisStarted {
        request_id: String,
        language: String,
        domain: String,
        timestamp: DateTime<Utc>,
    },

    /// Informational progress update (0-100)
    AnalysisProgress {
        request_id: String,
        progress: u8,
        timestamp: DateTime<Utc>,
    },

    /// Run finished successfully
    AnalysisCompleted {
        request_id: String,
        total_terms: usize,
        quality_score: f64,
        processing_time: f64,
        timestamp: DateTime<Utc>,
    },

    /// Run failed
    AnalysisFailed {
        request_id: String,
        error: String,
        timestamp: DateTime<Utc>,
    },
}

impl AnalysisEvent {
    /// Event type name as used for the SSE `event:` field
    pub fn event_type(&self) -> &'static str {
        match self {
            AnalysisEvent::AnalysisStarted { .. } => "AnalysisStarted",
            AnalysisEvent::AnalysisProgress { .. } => "AnalysisProgress",
            AnalysisEvent::AnalysisCompleted { .. } => "AnalysisCompleted",
            AnalysisEvent::AnalysisFailed { .. } => "AnalysisFailed",
        }
    }

    /// Request the event belongs to
    pub fn request_id(&self) -> &str {
        match self {
            AnalysisEvent::AnalysisStarted { request_id, .. }
            | AnalysisEvent::AnalysisProgress { request_id, .. }
            | AnalysisEvent::AnalysisCompleted { request_id, .. }
            | AnalysisEvent::AnalysisFailed { request_id, .. } => request_id,
        }
    }
}

/// Broadcast bus for analysis events
///
/// Uses tokio::broadcast internally: publishing never blocks on slow
/// subscribers, and lagging subscribers are told how many events they missed.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<AnalysisEvent>,
    capacity: usize,
}

impl EventBus {
    /// Creates a new EventBus with specified channel capacity
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx, capacity }
    }

    /// Subscribe to all future events
    pub fn subscribe(&self) -> broadcast::Receiver<AnalysisEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Returns `Err` if no subscribers are listening.
    #[allow(clippy::result_large_err)]
    pub fn emit(
        &self,
        event: AnalysisEvent,
    ) -> Result<usize, broadcast::error::SendError<AnalysisEvent>> {
        self.tx.send(event)
    }

    /// Emit an event, ignoring if no subscribers are listening
    pub fn emit_lossy(&self, event: AnalysisEvent) {
        let _ = self.tx.send(event);
    }

    /// Current number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Configured channel capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
