//! Book-related DTOs.

use bookshelf_core::rules::not_blank;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Create book request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateBookRequest {
    #[validate(
        length(max = 255, message = "Title must be at most 255 characters"),
        custom(function = "not_blank", message = "Title is required")
    )]
    pub title: String,

    /// Body text, may be empty.
    #[serde(default)]
    pub content: String,

    #[validate(
        length(max = 255, message = "Author must be at most 255 characters"),
        custom(function = "not_blank", message = "Author is required")
    )]
    pub author: String,
}

/// Query parameters of the book listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListBooksQuery {
    /// Only list books by this author.
    pub author: Option<String>,
}
