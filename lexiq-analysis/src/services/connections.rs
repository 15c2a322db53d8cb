//! Live WebSocket connection tracking

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use lexiq_common::{InMemoryStore, Store};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectionInfo {
    pub connection_id: String,
    pub connected_at: DateTime<Utc>,
    pub messages_received: u64,
}

pub struct ConnectionManager {
    connections: Arc<dyn Store<String, ConnectionInfo>>,
}

impl Default for ConnectionManager {
    fn default() -> Self {
        Self {
            connections: Arc::new(InMemoryStore::new()),
        }
    }
}

impl ConnectionManager {
    /// Register a connection, returning its id
    pub fn connect(&self) -> String {
        let connection_id = Uuid::new_v4().to_string();
        self.connections.put(
            connection_id.clone(),
            ConnectionInfo {
                connection_id: connection_id.clone(),
                connected_at: Utc::now(),
                messages_received: 0,
            },
        );
        info!(
            connection_id = %connection_id,
            active = self.active_count(),
            "WebSocket connected"
        );
        connection_id
    }

    pub fn disconnect(&self, connection_id: &str) {
        if let Some(info) = self.connections.delete(&connection_id.to_string()) {
            info!(
                connection_id = %connection_id,
                messages = info.messages_received,
                active = self.active_count(),
                "WebSocket disconnected"
            );
        }
    }

    pub fn record_message(&self, connection_id: &str) {
        self.connections
            .update(&connection_id.to_string(), &mut |c: &mut ConnectionInfo| {
                c.messages_received += 1;
            });
    }

    pub fn get(&self, connection_id: &str) -> Option<ConnectionInfo> {
        self.connections.get(&connection_id.to_string())
    }

    pub fn active_count(&self) -> usize {
        self.connections.len()
    }
}
