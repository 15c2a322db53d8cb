//! Data models for lexiq-analysis
//!
//! Request/response schemas for the analysis pipeline and for the
//! surrounding resources (projects, files, configuration, feedback,
//! reports, sessions, WebSocket frames).

pub mod analysis;
pub mod feedback;
pub mod file;
pub mod project;
pub mod report;
pub mod session;
pub mod user_config;
pub mod websocket;

pub use analysis::{
    AnalysisOptions, AnalysisRequest, AnalysisResponse, AnalysisStatistics, AnalysisStatus,
    AnalyzedTerm, Classification, ALLOWED_LANGUAGES, MAX_CONTENT_CHARS,
};
pub use feedback::{Feedback, FeedbackData, FeedbackReceipt};
pub use file::{FileMetadata, ProcessedFile};
pub use project::{Project, ProjectData};
pub use report::{GeneratedReport, ReportConfig, ReportFormat};
pub use session::UserSession;
pub use user_config::ConfigurationData;
pub use websocket::{WebSocketMessage, WebSocketResponse};
