//! WebSocket endpoint for realtime analysis
//!
//! Text frames carry JSON. Frame types:
//! - no `type`, or `analyze`: quick summary of `content`
//! - `analyze_full`: full pipeline over an `AnalysisRequest` in `data`
//! - `status`: registry lookup of `data.request_id`
//! - `ping`: replies `pong`
//!
//! A bad frame gets a `success: false` reply; the connection stays open.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
    routing::get,
    Router,
};
use futures::{SinkExt, StreamExt};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::analysis::analyze_realtime;
use crate::models::{AnalysisRequest, WebSocketMessage, WebSocketResponse};
use crate::AppState;

/// GET /ws/analysis
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let connection_id = state.connections.connect();
    let (mut sender, mut receiver) = socket.split();

    while let Some(message) = receiver.next().await {
        let text = match message {
            Ok(Message::Text(text)) => text,
            Ok(Message::Close(_)) => break,
            Ok(_) => continue,
            Err(e) => {
                debug!(connection_id = %connection_id, "WebSocket receive error: {}", e);
                break;
            }
        };
        state.connections.record_message(&connection_id);

        let reply = handle_frame(&state, &text).await;
        let payload = match serde_json::to_string(&reply) {
            Ok(payload) => payload,
            Err(e) => {
                warn!("Failed to serialize WebSocket reply: {}", e);
                continue;
            }
        };
        if sender.send(Message::Text(payload)).await.is_err() {
            break;
        }
    }

    state.connections.disconnect(&connection_id);
}

fn reply<T: Serialize>(message_type: &str, data: T, request_id: Option<String>) -> WebSocketResponse {
    match serde_json::to_value(data) {
        Ok(value) => WebSocketResponse::ok(message_type, value, request_id),
        Err(e) => WebSocketResponse::error(message_type, e.to_string(), request_id),
    }
}

fn str_field<'a>(body: &'a Value, key: &str, default: &'a str) -> &'a str {
    body.get(key).and_then(Value::as_str).unwrap_or(default)
}

/// Answer one text frame
pub async fn handle_frame(state: &AppState, text: &str) -> WebSocketResponse {
    let raw: Value = match serde_json::from_str(text) {
        Ok(value) => value,
        Err(e) => return WebSocketResponse::error("error", format!("Invalid JSON: {}", e), None),
    };
    let message: WebSocketMessage = match serde_json::from_value(raw.clone()) {
        Ok(message) => message,
        Err(e) => return WebSocketResponse::error("error", format!("Invalid message: {}", e), None),
    };
    let request_id = message.request_id.clone();

    match message.message_type.as_deref() {
        None | Some("analyze") => {
            // Bare frames carry their fields at the top level
            let body = if message.data.is_object() { &message.data } else { &raw };
            let summary = analyze_realtime(
                str_field(body, "content", ""),
                str_field(body, "language", "en"),
                str_field(body, "domain", "general"),
            );
            reply("analysis", summary, request_id)
        }
        Some("analyze_full") => {
            let request = serde_json::from_value::<AnalysisRequest>(message.data)
                .map_err(|e| format!("Invalid analysis request: {}", e))
                .and_then(|r| r.validate().map_err(|e| e.to_string()));
            let request = match request {
                Ok(request) => request,
                Err(e) => return WebSocketResponse::error("analysis_full", e, request_id),
            };
            match state.analysis.analyze(request).await {
                Ok(response) => reply("analysis_full", response, request_id),
                Err(e) => WebSocketResponse::error("analysis_full", e.to_string(), request_id),
            }
        }
        Some("status") => match message.data.get("request_id").and_then(Value::as_str) {
            Some(id) => reply("status", state.analysis.get_status(id), request_id),
            None => WebSocketResponse::error("status", "Missing data.request_id", request_id),
        },
        Some("ping") => WebSocketResponse::ok("pong", Value::Null, request_id),
        Some(other) => WebSocketResponse::error(
            "error",
            format!("Unknown message type: {}", other),
            request_id,
        ),
    }
}

pub fn ws_routes() -> Router<AppState> {
    Router::new().route("/ws/analysis", get(ws_handler))
}
