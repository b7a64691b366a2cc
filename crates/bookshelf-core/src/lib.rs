//! # Bookshelf Core
//!
//! Core types, traits, and error definitions for Bookshelf.
//! Every other crate in the workspace builds on the error type, the
//! `Book` entity and the health-check traits defined here.

pub mod book;
pub mod error;
pub mod id;
pub mod result;
pub mod traits;
pub mod validation;

pub use book::*;
pub use error::*;
pub use id::*;
pub use result::*;
pub use traits::*;
pub use validation::*;

// Re-export shaku for dependency injection
pub use shaku::{module, HasComponent, Interface};
