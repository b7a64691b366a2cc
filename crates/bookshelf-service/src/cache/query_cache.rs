//! Read-through query cache.
//!
//! A query opts into caching with [`CachedQuery::cache`]. On execution the
//! cache looks the query up in its collection's hash; on a miss it runs the
//! query against the source, writes the result back and refreshes the TTL of
//! the whole hash. Writes to a collection drop its hash with
//! [`QueryCacheInterface::clear_key`].

use super::{cache_keys, CacheStats, HashStore};
use async_trait::async_trait;
use bookshelf_core::{BookshelfResult, HealthCheck, HealthStatus, Interface};
use serde::{de::DeserializeOwned, Serialize};
use shaku::Component;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// TTL used when a query is cached without an explicit one (1 minute).
pub const DEFAULT_TTL: Duration = Duration::from_secs(60);

/// How a query result is cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheOptions {
    /// Lifetime of the collection hash, refreshed on every write-back.
    pub ttl: Duration,
    /// Hash to cache under instead of the collection name.
    pub key: Option<String>,
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_TTL,
            key: None,
        }
    }
}

impl CacheOptions {
    /// Options with the given TTL and the collection as hash.
    #[must_use]
    pub fn with_ttl(ttl: Duration) -> Self {
        Self { ttl, key: None }
    }

    /// Caches under `key` instead of the collection name.
    #[must_use]
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }
}

/// A read against one collection, optionally marked for caching.
#[derive(Debug, Clone)]
pub struct CachedQuery {
    collection: String,
    field: String,
    options: Option<CacheOptions>,
}

impl CachedQuery {
    /// Describes a query on `collection` matching `filter`. Not cached until
    /// [`cache`](Self::cache) is called.
    pub fn new<F: Serialize + ?Sized>(
        collection: impl Into<String>,
        filter: &F,
    ) -> BookshelfResult<Self> {
        Ok(Self {
            collection: collection.into(),
            field: cache_keys::query_field(filter)?,
            options: None,
        })
    }

    /// Marks the query for caching.
    #[must_use]
    pub fn cache(mut self, options: CacheOptions) -> Self {
        self.options = Some(options);
        self
    }

    /// Name of the queried collection.
    #[must_use]
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Serialized filter, used as the hash field.
    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Cache options, `None` for an uncached query.
    #[must_use]
    pub fn options(&self) -> Option<&CacheOptions> {
        self.options.as_ref()
    }

    /// Hash the result lives in, `None` for an uncached query.
    #[must_use]
    pub fn hash_key(&self) -> Option<String> {
        self.options.as_ref().map(|options| {
            cache_keys::hash_key(options.key.as_deref().unwrap_or(&self.collection))
        })
    }
}

/// Raw, dyn-compatible query cache operations.
///
/// Store failures are absorbed here: reads that fail count as misses and
/// failed writes are dropped, so a broken cache never fails a query.
#[async_trait]
pub trait QueryCacheInterface: Interface + Send + Sync {
    /// Returns the cached JSON for `field` of `hash_key`, if any.
    async fn lookup(&self, hash_key: &str, field: &str) -> Option<String>;

    /// Writes `value` under `field` of `hash_key` and sets the hash TTL.
    async fn store(&self, hash_key: &str, field: &str, value: &str, ttl: Duration);

    /// Drops every cached result stored under `key`.
    ///
    /// Returns `true` if anything was cached.
    async fn clear_key(&self, key: &str) -> BookshelfResult<bool>;

    /// Probes the backing store.
    async fn health(&self) -> HealthStatus;

    /// Hit/miss counters.
    fn stats(&self) -> &CacheStats;

    /// Check if results are cached at all.
    fn is_enabled(&self) -> bool;
}

/// Typed execution on top of [`QueryCacheInterface`].
#[async_trait]
pub trait QueryCacheExt: QueryCacheInterface {
    /// Runs `query`, serving it from the cache when possible.
    ///
    /// Uncached queries (and every query while the cache is disabled) go
    /// straight to `source` without touching the store.
    async fn fetch<T, F, Fut>(&self, query: &CachedQuery, source: F) -> BookshelfResult<T>
    where
        T: Serialize + DeserializeOwned + Send + Sync,
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = BookshelfResult<T>> + Send,
    {
        let (Some(options), Some(hash_key)) = (query.options(), query.hash_key()) else {
            return source().await;
        };
        if !self.is_enabled() {
            return source().await;
        }

        let field = query.field();

        if let Some(cached) = self.lookup(&hash_key, field).await {
            match serde_json::from_str::<T>(&cached) {
                Ok(value) => {
                    self.stats().record_hit();
                    debug!(hash_key = %hash_key, field = %field, "Query served from cache");
                    return Ok(value);
                }
                Err(e) => {
                    warn!(hash_key = %hash_key, field = %field, "Discarding unreadable cache entry: {}", e);
                }
            }
        }

        self.stats().record_miss();
        let value = source().await?;

        let json = serde_json::to_string(&value)?;
        self.store(&hash_key, field, &json, options.ttl).await;

        debug!(hash_key = %hash_key, field = %field, "Query served from store");
        Ok(value)
    }
}

impl<C: QueryCacheInterface + ?Sized> QueryCacheExt for C {}

/// Query cache over a [`HashStore`].
#[derive(Component)]
#[shaku(interface = QueryCacheInterface)]
pub struct QueryCache {
    #[shaku(inject)]
    store: Arc<dyn HashStore>,
    #[shaku(default)]
    stats: CacheStats,
}

impl QueryCache {
    /// Creates a query cache writing to `store`.
    #[must_use]
    pub fn new(store: Arc<dyn HashStore>) -> Self {
        Self {
            store,
            stats: CacheStats::new(),
        }
    }
}

#[async_trait]
impl QueryCacheInterface for QueryCache {
    async fn lookup(&self, hash_key: &str, field: &str) -> Option<String> {
        match self.store.hget(hash_key, field).await {
            Ok(value) => value,
            Err(e) => {
                self.stats.record_error();
                warn!(hash_key = %hash_key, "Cache read failed, falling back to source: {}", e);
                None
            }
        }
    }

    async fn store(&self, hash_key: &str, field: &str, value: &str, ttl: Duration) {
        if ttl.is_zero() {
            debug!(hash_key = %hash_key, "Zero TTL, result not cached");
            return;
        }

        if let Err(e) = self.store.hset(hash_key, field, value).await {
            self.stats.record_error();
            warn!(hash_key = %hash_key, "Cache write failed: {}", e);
            return;
        }
        self.stats.record_write();

        if let Err(e) = self.store.expire(hash_key, ttl).await {
            self.stats.record_error();
            warn!(hash_key = %hash_key, "Setting cache TTL failed: {}", e);
        }
    }

    async fn clear_key(&self, key: &str) -> BookshelfResult<bool> {
        let hash_key = cache_keys::hash_key(key);

        match self.store.del(&hash_key).await {
            Ok(existed) => {
                self.stats.record_invalidation();
                info!(hash_key = %hash_key, existed, "Cleared cached queries");
                Ok(existed)
            }
            Err(e) => {
                self.stats.record_error();
                Err(e)
            }
        }
    }

    async fn health(&self) -> HealthStatus {
        if !self.store.is_enabled() {
            return HealthStatus::Degraded("Cache disabled".to_string());
        }

        match self.store.ping().await {
            Ok(()) => HealthStatus::Healthy,
            Err(e) => HealthStatus::Unhealthy(e.to_string()),
        }
    }

    fn stats(&self) -> &CacheStats {
        &self.stats
    }

    fn is_enabled(&self) -> bool {
        self.store.is_enabled()
    }
}

impl std::fmt::Debug for QueryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryCache")
            .field("enabled", &self.store.is_enabled())
            .field("stats", &self.stats)
            .finish()
    }
}

/// Readiness probe over a query cache's backing store.
pub struct CacheHealthCheck {
    cache: Arc<dyn QueryCacheInterface>,
}

impl CacheHealthCheck {
    /// Creates a health check for `cache`.
    #[must_use]
    pub fn new(cache: Arc<dyn QueryCacheInterface>) -> Self {
        Self { cache }
    }
}

#[async_trait]
impl HealthCheck for CacheHealthCheck {
    fn name(&self) -> &str {
        "cache"
    }

    async fn check(&self) -> HealthStatus {
        self.cache.health().await
    }
}
