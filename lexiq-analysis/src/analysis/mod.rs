//! Analysis core
//!
//! Pipeline for one run: split content into whitespace-delimited terms,
//! classify and score each term, annotate it with position, context and
//! suggestions, then aggregate the terms into statistics. The orchestrator
//! drives a run and records its lifecycle in the request registry.
//!
//! `classify`, `score` and `aggregate` are pure and can be called directly
//! for batch paths and tests.

pub mod annotator;
pub mod classifier;
pub mod error;
pub mod orchestrator;
pub mod realtime;
pub mod registry;
pub mod scorer;
pub mod statistics;

pub use annotator::TermAnnotator;
pub use classifier::classify;
pub use error::{AnalysisError, ValidationError};
pub use orchestrator::AnalysisService;
pub use realtime::{analyze_realtime, RealtimeSummary};
pub use registry::{RegistryEntry, RequestRegistry, RequestStatus, RetentionPolicy};
pub use scorer::score;
pub use statistics::aggregate;
