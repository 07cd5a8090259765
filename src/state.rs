use std::sync::Arc;

use crate::config::AppConfig;
use crate::store::{MemoryStore, PgStore, UsuarioStore};
use crate::usuarios::repo::UsuarioRepository;
use crate::usuarios::services::UsuarioService;

#[derive(Clone)]
pub struct AppState {
    pub service: UsuarioService,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let store: Arc<dyn UsuarioStore> = match config.database_url.as_deref() {
            Some(url) => Arc::new(PgStore::connect(url).await?),
            None => {
                tracing::warn!("DATABASE_URL not set; falling back to the in-memory store");
                Arc::new(MemoryStore::new())
            }
        };

        Ok(Self::from_store(store, config))
    }

    pub fn from_store(store: Arc<dyn UsuarioStore>, config: Arc<AppConfig>) -> Self {
        let service = UsuarioService::new(UsuarioRepository::new(store));
        Self { service, config }
    }

    /// Estado autocontenido para tests de handlers.
    pub fn in_memory() -> Self {
        let config = Arc::new(AppConfig {
            host: "127.0.0.1".into(),
            port: 0,
            database_url: None,
        });
        Self::from_store(Arc::new(MemoryStore::new()), config)
    }
}
