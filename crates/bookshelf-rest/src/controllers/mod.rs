//! REST API controllers.

pub mod book_controller;
pub mod health_controller;

pub use health_controller::*;
