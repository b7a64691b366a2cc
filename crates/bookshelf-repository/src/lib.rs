//! # Bookshelf Repository
//!
//! Data access for books:
//!
//! ```text
//! Service
//!   ↓  Arc<dyn BookRepository>        (domain interface)
//! MySqlBookRepository                 (SQLx)
//!   ↓  Arc<dyn DatabasePoolInterface>
//! MySQL
//! ```

pub mod mysql;
pub mod pool;
pub mod traits;

pub use mysql::*;
pub use pool::*;
pub use traits::*;
