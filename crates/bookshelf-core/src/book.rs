//! The book record and the filter used to query it.

use crate::BookId;
use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

/// Name of the collection (table) books are stored in.
///
/// Also the default cache hash for book queries.
pub const BOOKS_COLLECTION: &str = "books";

/// A persisted book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub content: String,
    pub author: String,
    pub created_at: DateTime<Utc>,
}

impl Book {
    /// Creates a new, not yet persisted, book.
    ///
    /// `created_at` is kept at microsecond precision, the finest the
    /// database stores.
    #[must_use]
    pub fn new(title: String, content: String, author: String) -> Self {
        Self {
            id: BookId::new(),
            title,
            content,
            author,
            created_at: Utc::now().trunc_subsecs(6),
        }
    }
}

/// Conditions a book query matches on.
///
/// Serializes with absent conditions skipped, so the unfiltered query is `{}`.
/// The serialized form is what the query cache uses as a hash field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

impl BookFilter {
    /// Matches every book.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Matches the books written by `author`.
    #[must_use]
    pub fn by_author(author: impl Into<String>) -> Self {
        Self {
            author: Some(author.into()),
        }
    }

    /// Returns true if `book` satisfies the filter.
    #[must_use]
    pub fn matches(&self, book: &Book) -> bool {
        self.author.as_deref().map_or(true, |a| a == book.author)
    }
}
