//! Server-Sent Events endpoint

use axum::{
    extract::State,
    response::sse::{Event, Sse},
};
use futures::stream::Stream;
use std::convert::Infallible;

use crate::AppState;

/// GET /api/analyze/events
///
/// Streams analysis lifecycle events (started, progress, completed, failed)
/// for every run on this instance.
pub async fn analysis_event_stream(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    lexiq_common::sse::create_event_sse_stream("lexiq-analysis", &state.event_bus)
}
