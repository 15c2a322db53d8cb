//! Token authentication
//!
//! Stub credential check: any non-empty username and password logs in.
//! Issued tokens live in a store with a TTL and are bound to a session.
//! Expired tokens and sessions are swept at login, at most once per sweep
//! interval, so entries that are never looked up again are still reclaimed.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

use lexiq_common::api::{derive_user_id, generate_token, Principal};
use lexiq_common::{InMemoryStore, Store};

use super::sessions::SessionManager;
use crate::models::UserSession;

#[derive(Debug, Clone)]
pub struct TokenRecord {
    pub principal: Principal,
    pub session_id: String,
    pub expires_at: DateTime<Utc>,
}

/// Login response payload
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoginGrant {
    pub token: String,
    /// Seconds until the token expires
    pub expires_in: i64,
    pub user_id: String,
    pub session_id: String,
}

/// Default minimum time between two expiry sweeps
pub const SWEEP_INTERVAL_SECONDS: i64 = 60;

pub struct AuthService {
    tokens: Arc<dyn Store<String, TokenRecord>>,
    sessions: Arc<SessionManager>,
    token_ttl: Duration,
    sweep_interval: Duration,
    last_sweep: Mutex<DateTime<Utc>>,
}

impl AuthService {
    pub fn new(sessions: Arc<SessionManager>, token_ttl: Duration) -> Self {
        Self::with_store(Arc::new(InMemoryStore::new()), sessions, token_ttl)
    }

    pub fn with_store(
        tokens: Arc<dyn Store<String, TokenRecord>>,
        sessions: Arc<SessionManager>,
        token_ttl: Duration,
    ) -> Self {
        Self {
            tokens,
            sessions,
            token_ttl,
            sweep_interval: Duration::seconds(SWEEP_INTERVAL_SECONDS),
            last_sweep: Mutex::new(Utc::now()),
        }
    }

    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }

    /// Number of issued, not yet reclaimed tokens
    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    /// Issue a token; `None` for empty credentials
    pub fn login(&self, username: &str, password: &str) -> Option<LoginGrant> {
        if username.trim().is_empty() || password.is_empty() {
            return None;
        }

        self.maybe_sweep(Utc::now());

        let username = username.trim();
        let user_id = derive_user_id(username);
        let token = generate_token();
        let session = self.sessions.create_session(&user_id, "en", "general");

        self.tokens.put(
            token.clone(),
            TokenRecord {
                principal: Principal {
                    user_id: user_id.clone(),
                    username: username.to_string(),
                    token: token.clone(),
                },
                session_id: session.session_id.clone(),
                expires_at: Utc::now() + self.token_ttl,
            },
        );

        info!(user_id = %user_id, "User logged in");
        Some(LoginGrant {
            token,
            expires_in: self.token_ttl.num_seconds(),
            user_id,
            session_id: session.session_id,
        })
    }

    /// Principal for a live token; expired tokens are revoked
    pub fn resolve(&self, token: &str) -> Option<Principal> {
        self.live_record(token).map(|record| {
            self.sessions.touch(&record.session_id);
            record.principal
        })
    }

    /// Session bound to a live token
    pub fn session(&self, token: &str) -> Option<UserSession> {
        let record = self.live_record(token)?;
        self.sessions.get_session(&record.session_id)
    }

    /// Revoke a token and end its session
    pub fn logout(&self, token: &str) -> bool {
        match self.tokens.delete(&token.to_string()) {
            Some(record) => {
                self.sessions.end_session(&record.session_id);
                info!(user_id = %record.principal.user_id, "User logged out");
                true
            }
            None => false,
        }
    }

    /// Revoke expired tokens and drop expired sessions, returning the
    /// number of tokens revoked
    pub fn prune_expired(&self, now: DateTime<Utc>) -> usize {
        let expired: Vec<String> = self
            .tokens
            .values()
            .into_iter()
            .filter(|record| now >= record.expires_at)
            .map(|record| record.principal.token)
            .collect();
        let revoked = expired.iter().filter(|token| self.logout(token)).count();
        let sessions = self.sessions.prune_expired(now);

        if revoked > 0 || sessions > 0 {
            debug!("Swept {} expired tokens and {} expired sessions", revoked, sessions);
        }
        revoked
    }

    fn maybe_sweep(&self, now: DateTime<Utc>) {
        {
            let mut last = self.last_sweep.lock().unwrap_or_else(|e| e.into_inner());
            if now - *last < self.sweep_interval {
                return;
            }
            *last = now;
        }
        self.prune_expired(now);
    }

    fn live_record(&self, token: &str) -> Option<TokenRecord> {
        let record = self.tokens.get(&token.to_string())?;
        if Utc::now() >= record.expires_at {
            debug!(user_id = %record.principal.user_id, "Token expired");
            self.logout(token);
            return None;
        }
        Some(record)
    }
}
