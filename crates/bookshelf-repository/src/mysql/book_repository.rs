//! MySQL book repository implementation.

use crate::{traits::BookRepository, DatabasePoolInterface};
use async_trait::async_trait;
use bookshelf_core::{Book, BookFilter, BookId, BookshelfError, BookshelfResult};
use chrono::{DateTime, SubsecRound, Utc};
use shaku::Component;
use sqlx::{FromRow, MySql, QueryBuilder};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

const SELECT_BOOKS: &str = "SELECT id, title, content, author, created_at FROM books";
const SELECT_BOOK_BY_ID: &str =
    "SELECT id, title, content, author, created_at FROM books WHERE id = ?";

/// MySQL book repository implementation.
#[derive(Component, Clone)]
#[shaku(interface = BookRepository)]
pub struct MySqlBookRepository {
    #[shaku(inject)]
    pool: Arc<dyn DatabasePoolInterface>,
}

impl MySqlBookRepository {
    /// Creates a new MySQL book repository.
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self { pool }
    }
}

/// Database row representation of a book.
#[derive(Debug, FromRow)]
struct BookRow {
    id: String, // CHAR(36)
    title: String,
    content: String,
    author: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<BookRow> for Book {
    type Error = BookshelfError;

    fn try_from(row: BookRow) -> Result<Self, Self::Error> {
        let id = Uuid::parse_str(&row.id)
            .map_err(|e| BookshelfError::Internal(format!("Invalid UUID in database: {}", e)))?;

        Ok(Book {
            id: BookId::from_uuid(id),
            title: row.title,
            content: row.content,
            author: row.author,
            created_at: row.created_at,
        })
    }
}

/// Builds the select statement for `filter`.
fn select_matching(filter: &BookFilter) -> QueryBuilder<'_, MySql> {
    let mut query = QueryBuilder::new(SELECT_BOOKS);
    if let Some(author) = &filter.author {
        query.push(" WHERE author = ").push_bind(author);
    }
    query.push(" ORDER BY created_at ASC, id ASC");
    query
}

#[async_trait]
impl BookRepository for MySqlBookRepository {
    async fn find(&self, filter: &BookFilter) -> BookshelfResult<Vec<Book>> {
        debug!("Finding books matching {:?}", filter);

        let rows = select_matching(filter)
            .build_query_as::<BookRow>()
            .fetch_all(self.pool.inner())
            .await?;

        rows.into_iter().map(Book::try_from).collect()
    }

    async fn find_by_id(&self, id: BookId) -> BookshelfResult<Option<Book>> {
        debug!("Finding book by id: {}", id);

        let row = sqlx::query_as::<_, BookRow>(SELECT_BOOK_BY_ID)
            .bind(id.into_inner().to_string())
            .fetch_optional(self.pool.inner())
            .await?;

        row.map(Book::try_from).transpose()
    }

    async fn save(&self, book: &Book) -> BookshelfResult<Book> {
        debug!("Saving book: {}", book.id);

        // TIMESTAMP(6) keeps microseconds
        let saved = Book {
            created_at: book.created_at.trunc_subsecs(6),
            ..book.clone()
        };

        sqlx::query(
            r#"
            INSERT INTO books (id, title, content, author, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(saved.id.into_inner().to_string())
        .bind(&saved.title)
        .bind(&saved.content)
        .bind(&saved.author)
        .bind(saved.created_at)
        .execute(self.pool.inner())
        .await?;

        Ok(saved)
    }
}

impl std::fmt::Debug for MySqlBookRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MySqlBookRepository").finish_non_exhaustive()
    }
}
