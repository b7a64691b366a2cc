//! Repository trait definitions.

use bookshelf_core::{Book, BookFilter, BookId, BookshelfResult, Interface};
use async_trait::async_trait;

/// Book repository trait.
#[async_trait]
pub trait BookRepository: Interface + Send + Sync {
    /// Finds the books matching `filter`, oldest first.
    async fn find(&self, filter: &BookFilter) -> BookshelfResult<Vec<Book>>;

    /// Finds a book by ID.
    async fn find_by_id(&self, id: BookId) -> BookshelfResult<Option<Book>>;

    /// Saves a new book.
    async fn save(&self, book: &Book) -> BookshelfResult<Book>;
}
