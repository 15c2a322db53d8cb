//! Service lifecycle
//!
//! Components expose `start`/`stop`/`is_healthy`; the hosting process owns
//! the list of services, starts them before serving and stops them in
//! reverse order on shutdown.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{error, info};

use crate::Result;

/// Lifecycle capability implemented by each long-lived component
#[async_trait]
pub trait Service: Send + Sync {
    /// Name used in logs and the health report
    fn name(&self) -> &'static str;

    /// Acquire resources; called once before serving
    async fn start(&self) -> Result<()>;

    /// Release resources; called once on shutdown
    async fn stop(&self) -> Result<()>;

    /// Whether the component is started and able to serve
    async fn is_healthy(&self) -> bool;
}

/// Start services in order, stopping the already started ones if any fails
pub async fn start_all(services: &[Arc<dyn Service>]) -> Result<()> {
    for (index, service) in services.iter().enumerate() {
        if let Err(e) = service.start().await {
            error!("Failed to start {}: {}", service.name(), e);
            stop_all(&services[..index]).await;
            return Err(e);
        }
        info!("{} started", service.name());
    }
    Ok(())
}

/// Stop services in reverse order; failures are logged, not propagated
pub async fn stop_all(services: &[Arc<dyn Service>]) {
    for service in services.iter().rev() {
        match service.stop().await {
            Ok(()) => info!("{} stopped", service.name()),
            Err(e) => error!("Failed to stop {}: {}", service.name(), e),
        }
    }
}
