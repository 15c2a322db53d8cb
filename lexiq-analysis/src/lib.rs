//! lexiq-analysis library interface
//!
//! Text analysis microservice: the analysis core, its domain models, the
//! supporting services and the axum HTTP/WebSocket/SSE surface. Exposed as
//! a library so integration tests can drive the router directly.

pub mod analysis;
pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod services;

pub use crate::config::ServiceSettings;
pub use crate::error::{ApiError, ApiResult};

use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use axum::{middleware, Router};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use lexiq_common::events::EventBus;
use lexiq_common::{InMemoryStore, Service};

use crate::analysis::{AnalysisService, RequestRegistry, RetentionPolicy};
use crate::services::{
    AuthService, ConfigurationService, ConnectionManager, FeedbackService,
    FileProcessingService, ReportService, SessionManager, UsageTracker,
};

/// Multipart framing allowance on top of the file size limit
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<ServiceSettings>,
    /// Event bus for SSE broadcasting
    pub event_bus: EventBus,
    pub analysis: Arc<AnalysisService>,
    pub files: Arc<FileProcessingService>,
    pub sessions: Arc<SessionManager>,
    pub auth: Arc<AuthService>,
    pub user_config: Arc<ConfigurationService>,
    pub feedback: Arc<FeedbackService>,
    pub reports: Arc<ReportService>,
    pub usage: Arc<UsageTracker>,
    pub connections: Arc<ConnectionManager>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(settings: ServiceSettings) -> Self {
        let event_bus = EventBus::new(settings.event_capacity);
        let registry = RequestRegistry::new(
            Arc::new(InMemoryStore::new()),
            RetentionPolicy {
                ttl: settings.registry_ttl,
                max_entries: settings.registry_max_entries,
            },
        );
        let sessions = Arc::new(SessionManager::default());
        let usage = Arc::new(UsageTracker::default());

        Self {
            analysis: Arc::new(AnalysisService::new(registry, event_bus.clone())),
            files: Arc::new(FileProcessingService::new(
                settings.upload_dir.clone(),
                settings.max_file_size,
            )),
            auth: Arc::new(AuthService::new(Arc::clone(&sessions), settings.token_ttl)),
            sessions,
            user_config: Arc::new(ConfigurationService::default()),
            feedback: Arc::new(FeedbackService::default()),
            reports: Arc::new(ReportService::new(Arc::clone(&usage))),
            usage,
            connections: Arc::new(ConnectionManager::default()),
            event_bus,
            settings: Arc::new(settings),
            startup_time: Utc::now(),
        }
    }

    /// Long-lived components in start order
    pub fn services(&self) -> Vec<Arc<dyn Service>> {
        vec![
            self.analysis.clone() as Arc<dyn Service>,
            self.files.clone() as Arc<dyn Service>,
        ]
    }
}

/// Build application router
///
/// `/health`, `/auth/login` and `/ws/analysis` are public; everything else
/// goes through the bearer token middleware.
pub fn build_router(state: AppState) -> Router {
    let protected = Router::new()
        .merge(api::analyze_routes())
        .merge(api::file_routes())
        .merge(api::project_routes())
        .merge(api::statistics_routes())
        .merge(api::report_routes())
        .merge(api::config_routes())
        .merge(api::feedback_routes())
        .merge(api::session_routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api::auth_middleware,
        ));

    let public = Router::new()
        .merge(api::health_routes())
        .merge(api::login_routes())
        .merge(api::ws_routes());

    let body_limit = usize::try_from(state.settings.max_file_size)
        .unwrap_or(usize::MAX)
        .saturating_add(MULTIPART_OVERHEAD);

    Router::new()
        .merge(protected)
        .merge(public)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&state.settings.allowed_origins))
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(parsed))
}
