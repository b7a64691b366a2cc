//! # Bookshelf Service
//!
//! Service layer for Bookshelf: the read-through query cache and the
//! book use cases built on top of it.

pub mod book_service;
pub mod cache;
pub mod dto;
pub mod r#impl;

pub use book_service::*;
pub use cache::*;
pub use dto::*;
pub use r#impl::*;
