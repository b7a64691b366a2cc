//! Dependency injection module using Shaku.
//!
//! `BookshelfModule` wires the full stack in one process:
//! database pool, book repository, Redis hash store, query cache and
//! book service.

use bookshelf_config::CacheConfig;
use bookshelf_core::module;
use bookshelf_repository::{
    DatabasePool, DatabasePoolInterface, DatabasePoolParameters, MySqlBookRepository,
};
use bookshelf_service::{
    BookCachePolicy, BookServiceComponent, BookServiceComponentParameters, QueryCache,
    RedisHashStore, RedisHashStoreParameters,
};
use deadpool_redis::Pool;
use std::sync::Arc;

module! {
    pub BookshelfModule {
        components = [
            DatabasePool,
            MySqlBookRepository,
            RedisHashStore,
            QueryCache,
            BookServiceComponent,
        ],
        providers = [],
    }
}

/// Builds the application module.
///
/// `redis_pool` is `None` when Redis is disabled; the query cache then
/// passes every query through to the database.
pub fn build_module(
    db_pool: &DatabasePool,
    redis_pool: Option<Arc<Pool>>,
    cache_config: &CacheConfig,
) -> Arc<BookshelfModule> {
    let module = BookshelfModule::builder()
        .with_component_parameters::<DatabasePool>(DatabasePoolParameters {
            pool: db_pool.inner().clone(),
        })
        .with_component_parameters::<RedisHashStore>(RedisHashStoreParameters { pool: redis_pool })
        .with_component_parameters::<BookServiceComponent>(BookServiceComponentParameters {
            policy: BookCachePolicy::from(cache_config),
        })
        .build();

    Arc::new(module)
}
