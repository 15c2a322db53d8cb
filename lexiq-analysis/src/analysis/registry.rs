//! Request registry
//!
//! Maps request ids to their progress and outcome. Entries are written only
//! by the orchestrator; readers get snapshots through [`RequestRegistry::get_status`].
//!
//! Retention: terminal entries older than the TTL are pruned whenever a new
//! run registers, and when the registry is over capacity the oldest terminal
//! entries are evicted first. Entries still processing are never removed.
//!
//! Terminal entries are tracked in a finish-time index so pruning walks only
//! the entries it removes and never reads stored results.

use chrono::{DateTime, Duration, Utc};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};
use tracing::debug;

use lexiq_common::{InMemoryStore, Store};

use crate::models::{AnalysisResponse, AnalysisStatus};

/// Progress and outcome of one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistryEntry {
    pub request_id: String,
    pub status: AnalysisStatus,
    pub started_at: DateTime<Utc>,
    /// 0-100, informational
    pub progress: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<AnalysisResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
}

impl RegistryEntry {
    fn processing(request_id: &str, now: DateTime<Utc>) -> Self {
        Self {
            request_id: request_id.to_string(),
            status: AnalysisStatus::Processing,
            started_at: now,
            progress: 0,
            result: None,
            error: None,
            finished_at: None,
        }
    }
}

/// Outcome of a status lookup
///
/// Serializes to the entry itself, or to `{"status": "not_found"}`.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestStatus {
    Found(Box<RegistryEntry>),
    NotFound,
}

impl RequestStatus {
    pub fn is_found(&self) -> bool {
        matches!(self, RequestStatus::Found(_))
    }
}

impl Serialize for RequestStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            RequestStatus::Found(entry) => entry.serialize(serializer),
            RequestStatus::NotFound => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("status", "not_found")?;
                map.end()
            }
        }
    }
}

/// Limits applied to terminal entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionPolicy {
    pub ttl: Duration,
    pub max_entries: usize,
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self {
            ttl: Duration::seconds(3600),
            max_entries: 10_000,
        }
    }
}

/// Registry of analysis runs
#[derive(Clone)]
pub struct RequestRegistry {
    store: Arc<dyn Store<String, RegistryEntry>>,
    /// `(finished_at, request_id)` of terminal entries, oldest first
    finished: Arc<Mutex<BTreeSet<(DateTime<Utc>, String)>>>,
    policy: RetentionPolicy,
}

impl Default for RequestRegistry {
    fn default() -> Self {
        Self::new(Arc::new(InMemoryStore::new()), RetentionPolicy::default())
    }
}

impl RequestRegistry {
    pub fn new(store: Arc<dyn Store<String, RegistryEntry>>, policy: RetentionPolicy) -> Self {
        Self {
            store,
            finished: Arc::new(Mutex::new(BTreeSet::new())),
            policy,
        }
    }

    pub fn policy(&self) -> RetentionPolicy {
        self.policy
    }

    /// Number of tracked runs
    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Snapshot of a run; unknown ids are `NotFound`
    pub fn get_status(&self, request_id: &str) -> RequestStatus {
        match self.store.get(&request_id.to_string()) {
            Some(entry) => RequestStatus::Found(Box::new(entry)),
            None => RequestStatus::NotFound,
        }
    }

    pub(crate) fn register(&self, request_id: &str) {
        let now = Utc::now();
        self.prune(now);
        self.store
            .put(request_id.to_string(), RegistryEntry::processing(request_id, now));
    }

    pub(crate) fn set_progress(&self, request_id: &str, progress: u8) {
        self.store.update(&request_id.to_string(), &mut |entry: &mut RegistryEntry| {
            if !entry.status.is_terminal() {
                entry.progress = progress.min(100);
            }
        });
    }

    pub(crate) fn complete(&self, request_id: &str, response: AnalysisResponse) {
        let mut response = Some(response);
        let mut finished_at = None;
        self.store.update(&request_id.to_string(), &mut |entry: &mut RegistryEntry| {
            if entry.status.is_terminal() {
                return;
            }
            let now = Utc::now();
            entry.status = AnalysisStatus::Completed;
            entry.progress = 100;
            entry.result = response.take();
            entry.finished_at = Some(now);
            finished_at = Some(now);
        });
        self.index_finished(request_id, finished_at);
    }

    pub(crate) fn fail(&self, request_id: &str, error: &str) {
        let mut finished_at = None;
        self.store.update(&request_id.to_string(), &mut |entry: &mut RegistryEntry| {
            if entry.status.is_terminal() {
                return;
            }
            let now = Utc::now();
            entry.status = AnalysisStatus::Failed;
            entry.error = Some(error.to_string());
            entry.finished_at = Some(now);
            finished_at = Some(now);
        });
        self.index_finished(request_id, finished_at);
    }

    fn index_finished(&self, request_id: &str, finished_at: Option<DateTime<Utc>>) {
        if let Some(at) = finished_at {
            let mut finished = self.finished.lock().unwrap_or_else(|e| e.into_inner());
            finished.insert((at, request_id.to_string()));
        }
    }

    /// Apply the retention policy, returning the number of removed entries
    ///
    /// Walks terminal entries oldest first and stops at the first one that
    /// is neither expired nor needed to get under capacity.
    pub fn prune(&self, now: DateTime<Utc>) -> usize {
        // Leave room for the entry about to be registered
        let limit = self.policy.max_entries.saturating_sub(1);
        let mut finished = self.finished.lock().unwrap_or_else(|e| e.into_inner());

        let mut removed = 0;
        while let Some((finished_at, _)) = finished.first() {
            let expired = now - *finished_at > self.policy.ttl;
            if !expired && self.store.len() <= limit {
                break;
            }
            let Some((_, id)) = finished.pop_first() else {
                break;
            };
            if self.store.delete(&id).is_some() {
                removed += 1;
            }
        }
        drop(finished);

        if removed > 0 {
            debug!("Pruned {} analysis registry entries", removed);
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AnalysisStatistics;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn response(request_id: &str) -> AnalysisResponse {
        AnalysisResponse {
            terms: vec![],
            statistics: AnalysisStatistics {
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
                processing_time: 0.0,
            },
            status: AnalysisStatus::Completed,
            request_id: request_id.to_string(),
            language: "en".to_string(),
            domain: "general".to_string(),
            created_at: Utc::now(),
            metadata: None,
        }
    }

    fn entry(registry: &RequestRegistry, id: &str) -> RegistryEntry {
        match registry.get_status(id) {
            RequestStatus::Found(entry) => *entry,
            RequestStatus::NotFound => panic!("{} not found", id),
        }
    }

    #[test]
    fn test_unknown_id_serializes_not_found() {
        let registry = RequestRegistry::default();
        let status = registry.get_status("does-not-exist");
        assert_eq!(status, RequestStatus::NotFound);
        assert_eq!(
            serde_json::to_value(&status).unwrap(),
            serde_json::json!({"status": "not_found"})
        );
    }

    #[test]
    fn test_lifecycle_to_completed() {
        let registry = RequestRegistry::default();
        registry.register("r1");
        let e = entry(&registry, "r1");
        assert_eq!(e.status, AnalysisStatus::Processing);
        assert_eq!(e.progress, 0);

        registry.set_progress("r1", 25);
        assert_eq!(entry(&registry, "r1").progress, 25);

        registry.complete("r1", response("r1"));
        let e = entry(&registry, "r1");
        assert_eq!(e.status, AnalysisStatus::Completed);
        assert_eq!(e.progress, 100);
        assert!(e.result.is_some());
        assert!(e.finished_at.is_some());
    }

    #[test]
    fn test_terminal_entries_do_not_move() {
        let registry = RequestRegistry::default();
        registry.register("r1");
        registry.fail("r1", "boom");

        registry.complete("r1", response("r1"));
        registry.set_progress("r1", 50);

        let e = entry(&registry, "r1");
        assert_eq!(e.status, AnalysisStatus::Failed);
        assert_eq!(e.error.as_deref(), Some("boom"));
        assert!(e.result.is_none());
        assert_eq!(e.progress, 0);
    }

    #[test]
    fn test_found_serializes_entry() {
        let registry = RequestRegistry::default();
        registry.register("r1");
        let json = serde_json::to_value(registry.get_status("r1")).unwrap();
        assert_eq!(json["status"], "processing");
        assert_eq!(json["request_id"], "r1");
        assert!(json.get("result").is_none());
    }

    #[test]
    fn test_prune_removes_expired_terminal_entries() {
        let registry = RequestRegistry::new(
            Arc::new(InMemoryStore::new()),
            RetentionPolicy {
                ttl: Duration::seconds(60),
                max_entries: 100,
            },
        );
        registry.register("done");
        registry.complete("done", response("done"));
        registry.register("running");

        assert_eq!(registry.prune(Utc::now()), 0);

        let later = Utc::now() + Duration::seconds(120);
        assert_eq!(registry.prune(later), 1);
        assert!(!registry.get_status("done").is_found());
        assert!(registry.get_status("running").is_found());
    }

    #[test]
    fn test_capacity_evicts_oldest_terminal_first() {
        let registry = RequestRegistry::new(
            Arc::new(InMemoryStore::new()),
            RetentionPolicy {
                ttl: Duration::seconds(3600),
                max_entries: 3,
            },
        );
        registry.register("old");
        registry.complete("old", response("old"));
        std::thread::sleep(std::time::Duration::from_millis(5));
        registry.register("newer");
        registry.complete("newer", response("newer"));
        registry.register("running");

        // Registering a fourth entry makes room by evicting "old"
        registry.register("fourth");
        assert_eq!(registry.len(), 3);
        assert!(!registry.get_status("old").is_found());
        assert!(registry.get_status("newer").is_found());
        assert!(registry.get_status("running").is_found());
        assert!(registry.get_status("fourth").is_found());
    }

    #[test]
    fn test_processing_entries_never_evicted() {
        let registry = RequestRegistry::new(
            Arc::new(InMemoryStore::new()),
            RetentionPolicy {
                ttl: Duration::seconds(0),
                max_entries: 1,
            },
        );
        registry.register("a");
        registry.register("b");
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.prune(Utc::now() + Duration::days(1)), 0);
    }

    /// Store wrapper counting full-table reads
    struct CountingStore {
        inner: InMemoryStore<String, RegistryEntry>,
        value_scans: AtomicUsize,
    }

    impl Store<String, RegistryEntry> for CountingStore {
        fn get(&self, key: &String) -> Option<RegistryEntry> {
            self.inner.get(key)
        }

        fn put(&self, key: String, value: RegistryEntry) -> Option<RegistryEntry> {
            self.inner.put(key, value)
        }

        fn delete(&self, key: &String) -> Option<RegistryEntry> {
            self.inner.delete(key)
        }

        fn update(&self, key: &String, f: &mut dyn FnMut(&mut RegistryEntry)) -> bool {
            self.inner.update(key, f)
        }

        fn values(&self) -> Vec<RegistryEntry> {
            self.value_scans.fetch_add(1, Ordering::SeqCst);
            self.inner.values()
        }

        fn len(&self) -> usize {
            self.inner.len()
        }
    }

    #[test]
    fn test_register_does_not_scan_retained_results() {
        let store = Arc::new(CountingStore {
            inner: InMemoryStore::new(),
            value_scans: AtomicUsize::new(0),
        });
        let registry = RequestRegistry::new(
            store.clone(),
            RetentionPolicy {
                ttl: Duration::seconds(3600),
                max_entries: 10_000,
            },
        );

        for i in 0..2000 {
            let id = format!("r{}", i);
            registry.register(&id);
            registry.complete(&id, response(&id));
        }
        for i in 0..10 {
            registry.register(&format!("new{}", i));
        }

        assert_eq!(store.value_scans.load(Ordering::SeqCst), 0);
        assert_eq!(registry.len(), 2010);
        assert_eq!(registry.prune(Utc::now()), 0);
    }

    #[test]
    fn test_capacity_eviction_is_incremental() {
        let registry = RequestRegistry::new(
            Arc::new(InMemoryStore::new()),
            RetentionPolicy {
                ttl: Duration::seconds(3600),
                max_entries: 50,
            },
        );
        for i in 0..500 {
            let id = format!("r{}", i);
            registry.register(&id);
            registry.complete(&id, response(&id));
        }
        assert_eq!(registry.len(), 50);
        assert!(registry.get_status("r499").is_found());
        assert!(!registry.get_status("r0").is_found());
    }

    #[test]
    fn test_failed_entries_are_pruned_after_ttl() {
        let registry = RequestRegistry::new(
            Arc::new(InMemoryStore::new()),
            RetentionPolicy {
                ttl: Duration::seconds(60),
                max_entries: 100,
            },
        );
        registry.register("bad");
        registry.fail("bad", "boom");
        // A second terminal transition must not index the entry twice
        registry.complete("bad", response("bad"));

        assert_eq!(registry.prune(Utc::now() + Duration::seconds(120)), 1);
        assert!(registry.is_empty());
    }
}
