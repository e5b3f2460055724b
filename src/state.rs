use std::sync::Arc;

use crate::config::AppConfig;
use crate::database::{JsonStore, StoreError};

/// Shared handler state: the document store and the configuration it was opened with
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<JsonStore>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Open the configured store and bundle it with the config
    pub async fn from_config(config: AppConfig) -> Result<Self, StoreError> {
        let store = JsonStore::open(&config.store.db_path, config.security.bcrypt_cost).await?;
        Ok(Self {
            store: Arc::new(store),
            config: Arc::new(config),
        })
    }
}
