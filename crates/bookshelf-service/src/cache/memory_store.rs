//! In-process hash store.
//!
//! Mirrors the Redis hash semantics the query cache relies on, including
//! whole-hash expiry, so the cache can run without a server in tests and
//! local development.

use super::HashStore;
use async_trait::async_trait;
use bookshelf_core::BookshelfResult;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Default)]
struct HashEntry {
    fields: HashMap<String, String>,
    expires_at: Option<Instant>,
}

impl HashEntry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// Hash store kept in a process-local map.
#[derive(Debug, Default)]
pub struct InMemoryHashStore {
    hashes: Mutex<HashMap<String, HashEntry>>,
}

impl InMemoryHashStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `f` on the live hashes, dropping expired ones first.
    fn with_hashes<R>(&self, f: impl FnOnce(&mut HashMap<String, HashEntry>) -> R) -> R {
        let mut hashes = self
            .hashes
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let now = Instant::now();
        hashes.retain(|_, entry| !entry.is_expired(now));
        f(&mut hashes)
    }

    /// Number of fields currently stored under `key`.
    #[must_use]
    pub fn field_count(&self, key: &str) -> usize {
        self.with_hashes(|h| h.get(key).map_or(0, |e| e.fields.len()))
    }

    /// Remaining time-to-live of `key`, if it has one.
    #[must_use]
    pub fn ttl(&self, key: &str) -> Option<Duration> {
        self.with_hashes(|h| {
            h.get(key)
                .and_then(|e| e.expires_at)
                .map(|at| at.saturating_duration_since(Instant::now()))
        })
    }
}

#[async_trait]
impl HashStore for InMemoryHashStore {
    async fn hget(&self, key: &str, field: &str) -> BookshelfResult<Option<String>> {
        Ok(self.with_hashes(|h| h.get(key).and_then(|e| e.fields.get(field).cloned())))
    }

    async fn hset(&self, key: &str, field: &str, value: &str) -> BookshelfResult<()> {
        self.with_hashes(|h| {
            h.entry(key.to_string())
                .or_default()
                .fields
                .insert(field.to_string(), value.to_string());
        });
        Ok(())
    }

    async fn expire(&self, key: &str, ttl: Duration) -> BookshelfResult<bool> {
        Ok(self.with_hashes(|h| {
            if ttl.is_zero() {
                return h.remove(key).is_some();
            }
            match h.get_mut(key) {
                Some(entry) => {
                    entry.expires_at = Some(Instant::now() + ttl);
                    true
                }
                None => false,
            }
        }))
    }

    async fn del(&self, key: &str) -> BookshelfResult<bool> {
        Ok(self.with_hashes(|h| h.remove(key).is_some()))
    }

    async fn ping(&self) -> BookshelfResult<()> {
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        true
    }
}
