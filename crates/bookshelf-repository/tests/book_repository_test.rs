//! Integration tests for MySqlBookRepository.
//!
//! These tests run against a real MySQL database using testcontainers.
//! Requires Docker to be available on the system.

mod common;

use bookshelf_core::{Book, BookFilter, BookId, HealthCheck};
use bookshelf_repository::{BookRepository, DatabaseHealthCheck, MySqlBookRepository};
use chrono::{Duration, Timelike, Utc};
use common::TestDatabase;

fn create_test_book(title: &str, author: &str, minutes_ago: i64) -> Book {
    let mut book = Book::new(
        title.to_string(),
        format!("{title} content"),
        author.to_string(),
    );
    book.created_at = Utc::now() - Duration::minutes(minutes_ago);
    book
}

#[tokio::test]
async fn test_save_and_find_by_id() {
    let db = TestDatabase::new().await;
    let repo = MySqlBookRepository::new(db.pool());

    let book = create_test_book("Dune", "Frank Herbert", 0);
    let saved = repo.save(&book).await.expect("Failed to save book");
    assert_eq!(saved.title, "Dune");

    let found = repo
        .find_by_id(book.id)
        .await
        .expect("Query failed")
        .expect("Book not found");

    assert_eq!(found.id, book.id);
    assert_eq!(found.title, "Dune");
    assert_eq!(found.content, "Dune content");
    assert_eq!(found.author, "Frank Herbert");
    assert_eq!(found.created_at, saved.created_at);
    assert_eq!(found, saved);
}

#[tokio::test]
async fn test_save_truncates_created_at_to_micros() {
    let db = TestDatabase::new().await;
    let repo = MySqlBookRepository::new(db.pool());

    let mut book = create_test_book("Solaris", "Stanislaw Lem", 0);
    book.created_at = book.created_at.with_nanosecond(123_456_789).unwrap();

    let saved = repo.save(&book).await.expect("Failed to save book");
    assert_eq!(saved.created_at.nanosecond(), 123_456_000);

    let listed = repo.find(&BookFilter::all()).await.expect("Query failed");
    assert_eq!(listed, vec![saved]);
}

#[tokio::test]
async fn test_find_by_id_not_found() {
    let db = TestDatabase::new().await;
    let repo = MySqlBookRepository::new(db.pool());

    let result = repo.find_by_id(BookId::new()).await.expect("Query failed");
    assert!(result.is_none());
}

#[tokio::test]
async fn test_find_all_oldest_first() {
    let db = TestDatabase::new().await;
    let repo = MySqlBookRepository::new(db.pool());

    repo.save(&create_test_book("Newer", "B", 1)).await.unwrap();
    repo.save(&create_test_book("Older", "A", 10)).await.unwrap();

    let books = repo.find(&BookFilter::all()).await.expect("Query failed");
    let titles: Vec<_> = books.iter().map(|b| b.title.as_str()).collect();
    assert_eq!(titles, vec!["Older", "Newer"]);
}

#[tokio::test]
async fn test_find_by_author() {
    let db = TestDatabase::new().await;
    let repo = MySqlBookRepository::new(db.pool());

    repo.save(&create_test_book("A Wizard of Earthsea", "Ursula K. Le Guin", 3))
        .await
        .unwrap();
    repo.save(&create_test_book("Dune", "Frank Herbert", 2)).await.unwrap();
    repo.save(&create_test_book("The Dispossessed", "Ursula K. Le Guin", 1))
        .await
        .unwrap();

    let books = repo
        .find(&BookFilter::by_author("Ursula K. Le Guin"))
        .await
        .expect("Query failed");
    assert_eq!(books.len(), 2);
    assert!(books.iter().all(|b| b.author == "Ursula K. Le Guin"));

    let none = repo
        .find(&BookFilter::by_author("Nobody"))
        .await
        .expect("Query failed");
    assert!(none.is_empty());
}

#[tokio::test]
async fn test_find_by_author_is_exact() {
    let db = TestDatabase::new().await;
    let repo = MySqlBookRepository::new(db.pool());

    repo.save(&create_test_book("Dune", "Frank Herbert", 2)).await.unwrap();
    repo.save(&create_test_book("Whipping Star", "Frank Herbért", 1))
        .await
        .unwrap();

    for author in ["frank herbert", "FRANK HERBERT", "Frank Herbèrt"] {
        let books = repo
            .find(&BookFilter::by_author(author))
            .await
            .expect("Query failed");
        assert!(books.is_empty(), "{author:?} should not match");
    }

    let books = repo
        .find(&BookFilter::by_author("Frank Herbert"))
        .await
        .expect("Query failed");
    let titles: Vec<_> = books.iter().map(|b| b.title.as_str()).collect();
    assert_eq!(titles, vec!["Dune"]);
}

#[tokio::test]
async fn test_duplicate_id_is_conflict() {
    let db = TestDatabase::new().await;
    let repo = MySqlBookRepository::new(db.pool());

    let book = create_test_book("Dune", "Frank Herbert", 0);
    repo.save(&book).await.unwrap();

    let err = repo.save(&book).await.unwrap_err();
    assert_eq!(err.error_code(), "CONFLICT");
}

#[tokio::test]
async fn test_database_health_check() {
    let db = TestDatabase::new().await;
    let check = DatabaseHealthCheck::new(db.pool());

    assert_eq!(check.name(), "database");
    assert!(check.check().await.is_healthy());
}
