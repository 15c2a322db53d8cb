//! Server-Sent Events (SSE) utilities
//!
//! Streams AnalysisEvents from an EventBus to a browser, with a periodic
//! heartbeat so proxies keep the connection open.

use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::Stream;
use std::convert::Infallible;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

use crate::events::{AnalysisEvent, EventBus};

/// Heartbeat interval for SSE connections
pub const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(15);

/// Build an SSE event from an AnalysisEvent
pub fn to_sse_event(event: &AnalysisEvent) -> Event {
    match serde_json::to_string(event) {
        Ok(json) => Event::default().event(event.event_type()).data(json),
        Err(e) => {
            warn!("Failed to serialize event for SSE: {}", e);
            Event::default().comment("serialization error")
        }
    }
}

/// Create an SSE stream that forwards every event published on `bus`
///
/// The first frame is a `ConnectionStatus: connected` event. When the
/// subscriber lags behind, missed events are skipped and the stream
/// continues.
///
/// # Example
/// ```rust,ignore
/// pub async fn analysis_event_stream(
///     State(state): State<AppState>,
/// ) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
///     lexiq_common::sse::create_event_sse_stream("lexiq-analysis", &state.event_bus)
/// }
/// ```
pub fn create_event_sse_stream(
    service_name: &'static str,
    bus: &EventBus,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    info!("New SSE client connected to {} analysis events", service_name);
    let mut rx = bus.subscribe();

    let stream = async_stream::stream! {
        yield Ok(Event::default()
            .event("ConnectionStatus")
            .data("connected"));

        loop {
            match rx.recv().await {
                Ok(event) => {
                    debug!(request_id = %event.request_id(), "SSE: forwarding {}", event.event_type());
                    yield Ok(to_sse_event(&event));
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!("SSE: {} subscriber lagged, skipped {} events", service_name, skipped);
                }
                Err(RecvError::Closed) => {
                    info!("SSE: {} event bus closed", service_name);
                    break;
                }
            }
        }
    };

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(HEARTBEAT_INTERVAL)
            .text("heartbeat"),
    )
}
