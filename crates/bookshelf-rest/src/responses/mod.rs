//! API response types.

use bookshelf_core::{BookshelfError, ErrorResponse};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

/// Application error type for Axum.
///
/// Carries the status it renders with, normally the error's own.
#[derive(Debug)]
pub struct AppError {
    error: BookshelfError,
    status: StatusCode,
}

impl AppError {
    /// Renders `error` as 400 whatever its kind.
    #[must_use]
    pub fn bad_request(error: BookshelfError) -> Self {
        Self {
            error,
            status: StatusCode::BAD_REQUEST,
        }
    }

    /// Status the error renders with.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// The underlying error.
    #[must_use]
    pub const fn error(&self) -> &BookshelfError {
        &self.error
    }
}

impl From<BookshelfError> for AppError {
    fn from(error: BookshelfError) -> Self {
        let status =
            StatusCode::from_u16(error.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        Self { error, status }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(code = self.error.error_code(), "Request failed: {}", self.error);
        }

        let body = Json(ErrorResponse::from_error(&self.error));
        (self.status, body).into_response()
    }
}

/// Result type for Axum handlers.
pub type ApiResult<T> = Result<Json<T>, AppError>;

/// Helper to create a success response.
pub fn ok<T>(data: T) -> ApiResult<T> {
    Ok(Json(data))
}
