//! HTTP API handlers for lexiq-analysis
//!
//! JSON over HTTP for analysis, files, projects, reports, configuration and
//! feedback; SSE for analysis lifecycle events; WebSocket for realtime
//! analysis.

pub mod analyze;
pub mod auth;
pub mod extract;
pub mod feedback;
pub mod files;
pub mod health;
pub mod projects;
pub mod reports;
pub mod sse;
pub mod statistics;
pub mod user_config;
pub mod ws;

pub use analyze::analyze_routes;
pub use auth::{auth_middleware, login_routes, session_routes};
pub use extract::ApiJson;
pub use feedback::feedback_routes;
pub use files::file_routes;
pub use health::health_routes;
pub use projects::project_routes;
pub use reports::report_routes;
pub use sse::analysis_event_stream;
pub use statistics::statistics_routes;
pub use user_config::config_routes;
pub use ws::ws_routes;
