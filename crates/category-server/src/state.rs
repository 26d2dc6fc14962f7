use std::sync::Arc;

use category_core::{CategoryResult, CategoryStorage, SqliteCategoryStorage};

use crate::config::ServerConfig;

pub struct AppState {
    pub storage: Arc<dyn CategoryStorage>,
}

impl AppState {
    pub fn new(storage: Arc<dyn CategoryStorage>) -> Self {
        Self { storage }
    }

    /// Opens the SQLite store named in `config` and makes sure its schema exists.
    pub async fn from_config(config: &ServerConfig) -> CategoryResult<Self> {
        tracing::info!(path = %config.db_path.display(), "Initializing category storage");
        let storage = SqliteCategoryStorage::new(&config.db_path, config.limits);
        storage.init().await?;
        tracing::info!(path = %config.db_path.display(), "Category storage initialized");

        Ok(Self::new(Arc::new(storage)))
    }
}
