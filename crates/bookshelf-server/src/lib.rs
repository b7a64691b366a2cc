//! # Bookshelf Server Library
//!
//! Dependency injection wiring and startup helpers for the Bookshelf
//! server binary.

pub mod di;
pub mod startup;
