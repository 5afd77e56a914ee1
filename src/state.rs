//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::environment::EnvironmentConfig;
use crate::services::media_service::MediaService;
use crate::services::stream_service::ContractStream;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: EnvironmentConfig,
    pub media: MediaService,
    pub stream: Arc<ContractStream>,
}

impl AppState {
    pub fn new(pool: PgPool, config: EnvironmentConfig) -> Self {
        let media = MediaService::new(&config);
        Self {
            pool,
            config,
            media,
            stream: Arc::new(ContractStream::new()),
        }
    }
}
