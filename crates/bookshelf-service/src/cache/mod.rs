//! Caching infrastructure for the service layer.
//!
//! Query results are cached in hashes: one hash per collection (or per
//! caller-chosen key), one field per serialized query filter. The TTL is
//! applied to the whole hash, and a write to the collection drops the hash.

pub mod cache_keys;
mod hash_store;
mod memory_store;
mod query_cache;
mod redis_store;
mod stats;

pub use hash_store::HashStore;
#[cfg(test)]
pub use hash_store::MockHashStore;
pub use memory_store::InMemoryHashStore;
pub use query_cache::{
    CacheHealthCheck, CacheOptions, CachedQuery, QueryCache, QueryCacheExt, QueryCacheInterface,
    QueryCacheParameters, DEFAULT_TTL,
};
pub use redis_store::{create_redis_pool, RedisHashStore, RedisHashStoreParameters};
pub use stats::{CacheStats, CacheStatsSnapshot};
