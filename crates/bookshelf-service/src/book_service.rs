//! Book service trait definition.

use crate::dto::CreateBookRequest;
use async_trait::async_trait;
use bookshelf_core::{Book, BookId, BookshelfResult, Interface};

/// Book service trait.
#[async_trait]
pub trait BookService: Interface + Send + Sync {
    /// Lists books, optionally only those by `author`. Served from the query cache.
    async fn list_books(&self, author: Option<String>) -> BookshelfResult<Vec<Book>>;

    /// Gets a book by ID.
    async fn get_book(&self, id: BookId) -> BookshelfResult<Book>;

    /// Creates a book and invalidates the cached book queries.
    async fn create_book(&self, request: CreateBookRequest) -> BookshelfResult<Book>;
}
