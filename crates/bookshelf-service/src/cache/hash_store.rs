//! Hash store interface over the external key-value server.

use async_trait::async_trait;
use bookshelf_core::{BookshelfResult, Interface};
use std::time::Duration;

/// Hash-field operations the query cache needs from its backing store.
///
/// Values are JSON text; the store never interprets them.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HashStore: Interface + Send + Sync {
    /// Reads one field of a hash. `None` if the hash or the field is absent.
    async fn hget(&self, key: &str, field: &str) -> BookshelfResult<Option<String>>;

    /// Writes one field of a hash, creating the hash if needed.
    async fn hset(&self, key: &str, field: &str, value: &str) -> BookshelfResult<()>;

    /// Sets the time-to-live of a whole hash.
    ///
    /// Returns `false` if the hash does not exist.
    async fn expire(&self, key: &str, ttl: Duration) -> BookshelfResult<bool>;

    /// Deletes a hash with all its fields.
    ///
    /// Returns `true` if the hash existed.
    async fn del(&self, key: &str) -> BookshelfResult<bool>;

    /// Round-trips to the store.
    async fn ping(&self) -> BookshelfResult<()>;

    /// Check if the store is backed by a live server.
    fn is_enabled(&self) -> bool;
}
