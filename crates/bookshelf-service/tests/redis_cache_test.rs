//! Integration tests for the query cache on a real Redis server.
//!
//! Requires Docker to be available on the system.

use bookshelf_config::RedisConfig;
use bookshelf_core::{Book, BookFilter, BOOKS_COLLECTION};
use bookshelf_service::{
    create_redis_pool, CacheOptions, CachedQuery, HashStore, QueryCache, QueryCacheExt,
    QueryCacheInterface, RedisHashStore,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use testcontainers::{runners::AsyncRunner, ContainerAsync};
use testcontainers_modules::redis::{Redis, REDIS_PORT};

struct TestRedis {
    _container: ContainerAsync<Redis>,
    store: Arc<RedisHashStore>,
}

impl TestRedis {
    async fn new() -> Self {
        let container = Redis::default()
            .start()
            .await
            .expect("Failed to start Redis container");
        let port = container
            .get_host_port_ipv4(REDIS_PORT)
            .await
            .expect("Failed to get Redis port");

        let config = RedisConfig {
            url: format!("redis://127.0.0.1:{}", port),
            ..RedisConfig::default()
        };
        let pool = create_redis_pool(&config)
            .expect("Failed to create Redis pool")
            .expect("Redis is enabled");

        Self {
            _container: container,
            store: Arc::new(RedisHashStore::new(pool)),
        }
    }
}

fn books() -> Vec<Book> {
    vec![Book::new(
        "The Dispossessed".to_string(),
        "Anarres".to_string(),
        "Ursula K. Le Guin".to_string(),
    )]
}

#[tokio::test]
async fn test_hash_commands() {
    let redis = TestRedis::new().await;
    let store = &redis.store;

    store.ping().await.expect("Ping failed");
    store.hset("\"books\"", "{}", "[]").await.unwrap();
    store.hset("\"books\"", r#"{"author":"x"}"#, "[]").await.unwrap();

    assert_eq!(store.hget("\"books\"", "{}").await.unwrap().as_deref(), Some("[]"));
    assert!(store.expire("\"books\"", Duration::from_secs(30)).await.unwrap());
    assert!(store.del("\"books\"").await.unwrap());
    assert_eq!(store.hget("\"books\"", "{}").await.unwrap(), None);
    assert!(!store.expire("\"books\"", Duration::from_secs(30)).await.unwrap());
}

#[tokio::test]
async fn test_read_through_and_invalidate() {
    let redis = TestRedis::new().await;
    let cache = QueryCache::new(redis.store.clone());
    let query = CachedQuery::new(BOOKS_COLLECTION, &BookFilter::all())
        .unwrap()
        .cache(CacheOptions::with_ttl(Duration::from_secs(10)));
    let calls = AtomicUsize::new(0);

    for _ in 0..3 {
        let result: Vec<Book> = cache
            .fetch(&query, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(books())
            })
            .await
            .unwrap();
        assert_eq!(result.len(), 1);
    }
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    assert!(cache.clear_key(BOOKS_COLLECTION).await.unwrap());
    let _: Vec<Book> = cache
        .fetch(&query, || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(books())
        })
        .await
        .unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert!(cache.health().await.is_healthy());
}

#[tokio::test]
async fn test_hash_expires() {
    let redis = TestRedis::new().await;
    let cache = QueryCache::new(redis.store.clone());
    let query = CachedQuery::new(BOOKS_COLLECTION, &BookFilter::all())
        .unwrap()
        .cache(CacheOptions::with_ttl(Duration::from_secs(1)));

    let _: Vec<Book> = cache.fetch(&query, || async { Ok(books()) }).await.unwrap();
    assert!(redis.store.hget("\"books\"", "{}").await.unwrap().is_some());

    tokio::time::sleep(Duration::from_millis(2100)).await;
    assert_eq!(redis.store.hget("\"books\"", "{}").await.unwrap(), None);
}
