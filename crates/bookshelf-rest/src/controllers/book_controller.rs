//! Book controller.

use crate::{
    extractors::ValidatedJson,
    responses::{ok, AppError, ApiResult},
    state::AppState,
};
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Router,
};
use bookshelf_core::{Book, BookId, BookshelfError, ErrorResponse};
use bookshelf_service::{CreateBookRequest, ListBooksQuery};
use tracing::debug;

/// Creates the book router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_books).post(create_book))
        .route("/:id", get(get_book))
}

/// List books, optionally by author.
///
/// Author listings are cached for a minute, the full listing for ten seconds.
#[utoipa::path(
    get,
    path = "/api/books",
    tag = "books",
    params(ListBooksQuery),
    responses(
        (status = 200, description = "Books, oldest first", body = Vec<Book>),
        (status = 500, description = "Store unavailable", body = ErrorResponse)
    )
)]
pub async fn list_books(
    State(state): State<AppState>,
    Query(query): Query<ListBooksQuery>,
) -> ApiResult<Vec<Book>> {
    debug!("List books request, author: {:?}", query.author);

    let books = state.book_service.list_books(query.author).await?;
    ok(books)
}

/// Create a book.
///
/// Every failure, including storage errors, is reported as 400.
#[utoipa::path(
    post,
    path = "/api/books",
    tag = "books",
    request_body = CreateBookRequest,
    responses(
        (status = 200, description = "Book created", body = Book),
        (status = 400, description = "Invalid request or book not saved", body = ErrorResponse)
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateBookRequest>,
) -> ApiResult<Book> {
    debug!("Create book request: {}", request.title);

    let book = state
        .book_service
        .create_book(request)
        .await
        .map_err(AppError::bad_request)?;
    ok(book)
}

/// Get a book by ID.
#[utoipa::path(
    get,
    path = "/api/books/{id}",
    tag = "books",
    params(("id" = String, Path, description = "Book UUID")),
    responses(
        (status = 200, description = "Book found", body = Book),
        (status = 400, description = "Malformed ID", body = ErrorResponse),
        (status = 404, description = "Book not found", body = ErrorResponse)
    )
)]
pub async fn get_book(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Book> {
    debug!("Get book request: {}", id);

    let id = parse_book_id(&id)?;
    let book = state.book_service.get_book(id).await?;
    ok(book)
}

fn parse_book_id(id: &str) -> Result<BookId, AppError> {
    BookId::parse(id).map_err(|e| {
        AppError::bad_request(BookshelfError::validation(format!("Invalid book ID: {}", e)))
    })
}
