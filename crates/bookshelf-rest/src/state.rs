//! Application state for Axum handlers.

use bookshelf_core::HealthCheck;
use bookshelf_repository::{DatabaseHealthCheck, DatabasePoolInterface};
use bookshelf_service::{BookService, CacheHealthCheck, QueryCacheInterface};
use shaku::{HasComponent, Module};
use std::sync::Arc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub book_service: Arc<dyn BookService>,
    pub query_cache: Arc<dyn QueryCacheInterface>,
    /// Dependencies probed by the readiness endpoint.
    pub health_checks: Vec<Arc<dyn HealthCheck>>,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(
        book_service: Arc<dyn BookService>,
        query_cache: Arc<dyn QueryCacheInterface>,
        health_checks: Vec<Arc<dyn HealthCheck>>,
    ) -> Self {
        Self {
            book_service,
            query_cache,
            health_checks,
        }
    }

    /// Resolves the services from a Shaku module.
    ///
    /// Readiness covers the database and the cache store.
    pub fn from_module<M>(module: &M) -> Self
    where
        M: Module
            + HasComponent<dyn BookService>
            + HasComponent<dyn QueryCacheInterface>
            + HasComponent<dyn DatabasePoolInterface>,
    {
        let book_service: Arc<dyn BookService> = module.resolve();
        let query_cache: Arc<dyn QueryCacheInterface> = module.resolve();
        let pool: Arc<dyn DatabasePoolInterface> = module.resolve();

        let health_checks: Vec<Arc<dyn HealthCheck>> = vec![
            Arc::new(DatabaseHealthCheck::new(pool)),
            Arc::new(CacheHealthCheck::new(query_cache.clone())),
        ];

        Self::new(book_service, query_cache, health_checks)
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let checks: Vec<_> = self.health_checks.iter().map(|c| c.name().to_string()).collect();
        f.debug_struct("AppState")
            .field("health_checks", &checks)
            .finish_non_exhaustive()
    }
}
