//! Cache key derivation.
//!
//! Both the hash key and the field are JSON text: the hash key is the JSON
//! string of the collection name (so `books` becomes `"books"` with quotes),
//! the field is the JSON serialization of the query filter.

use bookshelf_core::BookshelfResult;
use serde::Serialize;
use serde_json::Value;

/// Returns the hash key for a collection name or caller-supplied key.
#[must_use]
pub fn hash_key(name: &str) -> String {
    Value::from(name).to_string()
}

/// Returns the hash field for a query filter.
///
/// Struct filters serialize in declaration order; map filters built from
/// `serde_json::Value` serialize with sorted keys. Either way equal filters
/// produce equal fields.
pub fn query_field<F: Serialize + ?Sized>(filter: &F) -> BookshelfResult<String> {
    Ok(serde_json::to_string(filter)?)
}
