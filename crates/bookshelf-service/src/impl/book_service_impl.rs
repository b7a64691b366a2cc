//! Book service implementation.

use crate::book_service::BookService;
use crate::cache::{CacheOptions, CachedQuery, QueryCacheExt, QueryCacheInterface, DEFAULT_TTL};
use crate::dto::CreateBookRequest;
use async_trait::async_trait;
use bookshelf_config::CacheConfig;
use bookshelf_core::{
    Book, BookFilter, BookId, BookshelfError, BookshelfResult, ValidateExt, BOOKS_COLLECTION,
};
use bookshelf_repository::BookRepository;
use shaku::Component;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// TTLs for the cached book queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookCachePolicy {
    /// Author listings and single-book reads.
    pub default_ttl: Duration,
    /// The unfiltered listing, which changes with every new book.
    pub list_ttl: Duration,
}

impl Default for BookCachePolicy {
    fn default() -> Self {
        Self {
            default_ttl: DEFAULT_TTL,
            list_ttl: Duration::from_secs(10),
        }
    }
}

impl From<&CacheConfig> for BookCachePolicy {
    fn from(config: &CacheConfig) -> Self {
        Self {
            default_ttl: config.default_ttl(),
            list_ttl: config.list_ttl(),
        }
    }
}

/// Book service component for DI.
#[derive(Component)]
#[shaku(interface = BookService)]
pub struct BookServiceComponent {
    #[shaku(inject)]
    book_repository: Arc<dyn BookRepository>,
    #[shaku(inject)]
    query_cache: Arc<dyn QueryCacheInterface>,
    policy: BookCachePolicy,
}

impl BookServiceComponent {
    /// Creates a new book service.
    pub fn new(
        book_repository: Arc<dyn BookRepository>,
        query_cache: Arc<dyn QueryCacheInterface>,
        policy: BookCachePolicy,
    ) -> Self {
        Self {
            book_repository,
            query_cache,
            policy,
        }
    }

    fn options_for(&self, filter: &BookFilter) -> CacheOptions {
        if filter.author.is_some() {
            CacheOptions::with_ttl(self.policy.default_ttl)
        } else {
            CacheOptions::with_ttl(self.policy.list_ttl)
        }
    }
}

#[async_trait]
impl BookService for BookServiceComponent {
    async fn list_books(&self, author: Option<String>) -> BookshelfResult<Vec<Book>> {
        let filter = match author.filter(|a| !a.is_empty()) {
            Some(author) => BookFilter::by_author(author),
            None => BookFilter::all(),
        };
        debug!("Listing books matching {:?}", filter);

        let query = CachedQuery::new(BOOKS_COLLECTION, &filter)?.cache(self.options_for(&filter));
        self.query_cache
            .fetch(&query, || self.book_repository.find(&filter))
            .await
    }

    async fn get_book(&self, id: BookId) -> BookshelfResult<Book> {
        debug!("Getting book: {}", id);

        let query = CachedQuery::new(BOOKS_COLLECTION, &serde_json::json!({ "id": id }))?
            .cache(CacheOptions::with_ttl(self.policy.default_ttl));
        self.query_cache
            .fetch(&query, || self.book_repository.find_by_id(id))
            .await?
            .ok_or_else(|| BookshelfError::not_found("Book", id))
    }

    async fn create_book(&self, request: CreateBookRequest) -> BookshelfResult<Book> {
        debug!("Creating book: {}", request.title);

        request.validate_request()?;

        let book = Book::new(request.title, request.content, request.author);
        let saved = self.book_repository.save(&book).await?;

        // The write is committed; a stale cache only lives until its TTL.
        if let Err(e) = self.query_cache.clear_key(BOOKS_COLLECTION).await {
            warn!(book_id = %saved.id, "Failed to invalidate cached book queries: {}", e);
        }

        info!("Book created: {}", saved.id);
        Ok(saved)
    }
}

impl std::fmt::Debug for BookServiceComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BookServiceComponent")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}
