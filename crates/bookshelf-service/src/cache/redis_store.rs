//! Redis-backed hash store.

use super::HashStore;
use async_trait::async_trait;
use bookshelf_config::RedisConfig;
use bookshelf_core::{BookshelfError, BookshelfResult};
use deadpool_redis::{redis::AsyncCommands, Pool, PoolConfig, Runtime};
use shaku::Component;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Redis-based hash store.
#[derive(Component)]
#[shaku(interface = HashStore)]
pub struct RedisHashStore {
    /// Redis connection pool, `None` when Redis is disabled.
    pool: Option<Arc<Pool>>,
}

impl RedisHashStore {
    /// Create a new Redis hash store.
    #[must_use]
    pub fn new(pool: Arc<Pool>) -> Self {
        Self { pool: Some(pool) }
    }

    /// Create a no-op store (for when Redis is disabled).
    ///
    /// Every read misses and every write is dropped.
    #[must_use]
    pub fn disabled() -> Self {
        Self { pool: None }
    }

    /// Get a connection from the pool.
    async fn get_conn(&self) -> BookshelfResult<deadpool_redis::Connection> {
        match &self.pool {
            Some(pool) => pool.get().await.map_err(|e| {
                BookshelfError::Cache(format!("Failed to get Redis connection: {}", e))
            }),
            None => Err(BookshelfError::Cache("Cache is disabled".to_string())),
        }
    }
}

/// Whole seconds for `EXPIRE`; sub-second TTLs round up to one second.
fn ttl_secs(ttl: Duration) -> i64 {
    let secs = ttl.as_secs() + u64::from(ttl.subsec_nanos() > 0);
    i64::try_from(secs.max(1)).unwrap_or(i64::MAX)
}

#[async_trait]
impl HashStore for RedisHashStore {
    fn is_enabled(&self) -> bool {
        self.pool.is_some()
    }

    async fn hget(&self, key: &str, field: &str) -> BookshelfResult<Option<String>> {
        if !self.is_enabled() {
            return Ok(None);
        }

        let mut conn = self.get_conn().await?;
        let value: Option<String> = conn.hget(key, field).await.map_err(|e| {
            BookshelfError::Cache(format!("Failed to read {} of '{}': {}", field, key, e))
        })?;

        Ok(value)
    }

    async fn hset(&self, key: &str, field: &str, value: &str) -> BookshelfResult<()> {
        if !self.is_enabled() {
            return Ok(());
        }

        let mut conn = self.get_conn().await?;
        conn.hset::<_, _, _, ()>(key, field, value)
            .await
            .map_err(|e| {
                BookshelfError::Cache(format!("Failed to write {} of '{}': {}", field, key, e))
            })?;

        debug!("Stored field {} in '{}'", field, key);
        Ok(())
    }

    async fn expire(&self, key: &str, ttl: Duration) -> BookshelfResult<bool> {
        if !self.is_enabled() {
            return Ok(false);
        }

        let mut conn = self.get_conn().await?;
        let secs = ttl_secs(ttl);
        let applied: bool = conn.expire(key, secs).await.map_err(|e| {
            BookshelfError::Cache(format!("Failed to expire '{}': {}", key, e))
        })?;

        debug!("Set TTL {}s on '{}': {}", secs, key, applied);
        Ok(applied)
    }

    async fn del(&self, key: &str) -> BookshelfResult<bool> {
        if !self.is_enabled() {
            return Ok(false);
        }

        let mut conn = self.get_conn().await?;
        let deleted: i64 = conn.del(key).await.map_err(|e| {
            BookshelfError::Cache(format!("Failed to delete '{}': {}", key, e))
        })?;

        debug!("Deleted '{}': {}", key, deleted > 0);
        Ok(deleted > 0)
    }

    async fn ping(&self) -> BookshelfResult<()> {
        let mut conn = self.get_conn().await?;
        let _: String = deadpool_redis::redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| BookshelfError::Cache(format!("Ping failed: {}", e)))?;
        Ok(())
    }
}

impl std::fmt::Debug for RedisHashStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisHashStore")
            .field("enabled", &self.pool.is_some())
            .finish()
    }
}

/// Creates the Redis pool described by `config`, or `None` when disabled.
///
/// No connection is opened here; the pool connects lazily and a dead
/// connection is replaced on the next checkout.
pub fn create_redis_pool(config: &RedisConfig) -> BookshelfResult<Option<Arc<Pool>>> {
    if !config.enabled {
        return Ok(None);
    }

    let mut redis_cfg = deadpool_redis::Config::from_url(&config.url);
    let mut pool_cfg = PoolConfig::new(config.pool_size);
    pool_cfg.timeouts.wait = Some(config.wait_timeout());
    pool_cfg.timeouts.create = Some(config.wait_timeout());
    pool_cfg.timeouts.recycle = Some(config.wait_timeout());
    redis_cfg.pool = Some(pool_cfg);

    let pool = redis_cfg
        .create_pool(Some(Runtime::Tokio1))
        .map_err(|e| BookshelfError::Cache(format!("Failed to create Redis pool: {}", e)))?;

    Ok(Some(Arc::new(pool)))
}
