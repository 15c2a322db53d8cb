//! Per-user configuration

use std::sync::Arc;

use lexiq_common::{InMemoryStore, Store};

use crate::analysis::ValidationError;
use crate::models::{ConfigurationData, ALLOWED_LANGUAGES};

pub struct ConfigurationService {
    store: Arc<dyn Store<String, ConfigurationData>>,
}

impl Default for ConfigurationService {
    fn default() -> Self {
        Self::new(Arc::new(InMemoryStore::new()))
    }
}

impl ConfigurationService {
    pub fn new(store: Arc<dyn Store<String, ConfigurationData>>) -> Self {
        Self { store }
    }

    /// Stored configuration, or defaults when the user never saved one
    pub fn get(&self, user_id: &str) -> ConfigurationData {
        self.store.get(&user_id.to_string()).unwrap_or_default()
    }

    /// Replace the user's configuration
    pub fn update(
        &self,
        user_id: &str,
        config: ConfigurationData,
    ) -> Result<ConfigurationData, ValidationError> {
        if !ALLOWED_LANGUAGES.contains(&config.language.as_str()) {
            return Err(ValidationError::new(format!(
                "Language must be one of: {}",
                ALLOWED_LANGUAGES.join(", ")
            )));
        }
        self.store.put(user_id.to_string(), config.clone());
        Ok(config)
    }
}
