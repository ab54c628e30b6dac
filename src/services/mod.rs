//! Business logic services

pub mod auth;
pub mod catalog;
pub mod loans;
pub mod redis;
pub mod session;

use std::sync::Arc;

use crate::{
    config::{AppConfig, SessionBackend},
    error::AppResult,
    models::renewal::RenewalPolicy,
    repository::Repository,
};

use session::{MemorySessionStore, SessionStore};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub auth: auth::AuthService,
    pub catalog: catalog::CatalogService,
    pub loans: loans::LoansService,
}

impl Services {
    /// Create all services with the given repository and session store
    pub fn new(repository: Repository, sessions: Arc<dyn SessionStore>, config: &AppConfig) -> Self {
        Self {
            auth: auth::AuthService::new(repository.clone(), config.auth.clone()),
            catalog: catalog::CatalogService::new(
                repository.clone(),
                sessions,
                config.catalog.default_date_of_death,
            ),
            loans: loans::LoansService::new(repository, RenewalPolicy::from(&config.catalog)),
        }
    }
}

/// Open the session store selected in configuration
pub async fn session_store(config: &AppConfig) -> AppResult<Arc<dyn SessionStore>> {
    match config.session.backend {
        SessionBackend::Redis => {
            let store =
                self::redis::RedisSessionStore::new(&config.session.redis_url, config.session.ttl_seconds)
                    .await?;
            Ok(Arc::new(store))
        }
        SessionBackend::Memory => Ok(Arc::new(MemorySessionStore::new())),
    }
}
