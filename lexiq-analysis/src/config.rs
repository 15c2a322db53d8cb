//! Runtime settings for lexiq-analysis
//!
//! Resolved once at startup from the TOML bootstrap config plus CLI
//! overrides, then shared read-only through `AppState`.

use chrono::Duration;
use std::path::{Path, PathBuf};

use lexiq_common::config::TomlConfig;

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceSettings {
    pub host: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
    pub log_level: String,
    pub root_folder: PathBuf,
    pub upload_dir: PathBuf,
    pub max_file_size: u64,
    pub max_batch_size: usize,
    pub registry_ttl: Duration,
    pub registry_max_entries: usize,
    pub event_capacity: usize,
    pub auth_enabled: bool,
    pub token_ttl: Duration,
}

impl ServiceSettings {
    /// Compiled defaults rooted at `root_folder`
    pub fn new(root_folder: impl Into<PathBuf>) -> Self {
        Self::from_toml(&TomlConfig::default(), root_folder.into())
    }

    pub fn from_toml(toml: &TomlConfig, root_folder: PathBuf) -> Self {
        let upload_dir = toml
            .files
            .upload_dir
            .clone()
            .unwrap_or_else(|| root_folder.join("uploads"));

        Self {
            host: toml.server.host.clone(),
            port: toml.server.port,
            allowed_origins: toml.server.allowed_origins.clone(),
            log_level: toml.logging.level.clone(),
            root_folder,
            upload_dir,
            max_file_size: toml.files.max_file_size as u64,
            max_batch_size: toml.analysis.max_batch_size.max(1),
            registry_ttl: seconds(toml.analysis.registry_ttl_seconds),
            registry_max_entries: toml.analysis.registry_max_entries.max(1),
            event_capacity: toml.analysis.event_capacity,
            auth_enabled: toml.auth.enabled,
            token_ttl: seconds(toml.auth.token_ttl_seconds),
        }
    }

    /// Apply command-line overrides
    pub fn with_overrides(mut self, host: Option<String>, port: Option<u16>) -> Self {
        if let Some(host) = host {
            self.host = host;
        }
        if let Some(port) = port {
            self.port = port;
        }
        self
    }

    pub fn with_auth(mut self, enabled: bool) -> Self {
        self.auth_enabled = enabled;
        self
    }

    pub fn with_upload_dir(mut self, dir: &Path) -> Self {
        self.upload_dir = dir.to_path_buf();
        self
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Upper bound for configured durations (100 years)
const MAX_DURATION_SECONDS: u64 = 100 * 365 * 24 * 3600;

fn seconds(value: u64) -> Duration {
    Duration::seconds(value.min(MAX_DURATION_SECONDS) as i64)
}
