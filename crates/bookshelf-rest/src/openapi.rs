//! OpenAPI documentation for the REST API.

use crate::controllers::health_controller::{
    CacheHealthResponse, ComponentHealth, HealthResponse, ReadinessResponse,
};
use bookshelf_core::{Book, BookId, ErrorResponse, FieldError};
use bookshelf_service::{CacheStatsSnapshot, CreateBookRequest};
use utoipa::OpenApi;

/// OpenAPI documentation for the Bookshelf API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Bookshelf API",
        version = "1.0.0",
        description = "Book catalogue with a read-through query cache",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    paths(
        crate::controllers::book_controller::list_books,
        crate::controllers::book_controller::create_book,
        crate::controllers::book_controller::get_book,
        crate::controllers::health_controller::health_check,
        crate::controllers::health_controller::readiness_check,
        crate::controllers::health_controller::liveness_check,
        crate::controllers::health_controller::cache_stats,
    ),
    components(
        schemas(
            Book,
            BookId,
            CreateBookRequest,
            ErrorResponse,
            FieldError,
            HealthResponse,
            ReadinessResponse,
            ComponentHealth,
            CacheHealthResponse,
            CacheStatsSnapshot,
        )
    ),
    tags(
        (name = "books", description = "Book endpoints"),
        (name = "health", description = "Health check endpoints")
    )
)]
pub struct ApiDoc;
