//! Application services
//!
//! Glue around the analysis core: authentication, sessions and projects,
//! file ingestion, per-user configuration, feedback, usage tracking and
//! report rendering. Every service keeps its state in injectable
//! [`lexiq_common::Store`]s.

pub mod auth;
pub mod connections;
pub mod feedback;
pub mod files;
pub mod reports;
pub mod sessions;
pub mod usage;
pub mod user_config;

pub use auth::{AuthService, LoginGrant};
pub use connections::{ConnectionInfo, ConnectionManager};
pub use feedback::FeedbackService;
pub use files::{FileError, FileProcessingService, FileUpload};
pub use reports::ReportService;
pub use sessions::SessionManager;
pub use usage::{AnalysisSummary, UsageStatistics, UsageTracker};
pub use user_config::ConfigurationService;
