//! Service implementations.
//!
//! Trait definitions live in the parent module (e.g. `book_service.rs`).

pub mod book_service_impl;

pub use book_service_impl::{BookCachePolicy, BookServiceComponent, BookServiceComponentParameters};
