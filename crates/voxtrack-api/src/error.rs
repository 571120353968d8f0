//! Maps domain `AppError` to HTTP responses.
//!
//! Every response body is a single line of plain text. Client mistakes
//! (validation, duplicates, unknown or closed sessions) are 400; anything
//! else is 500. Causes are logged where the failure is classified, not here.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use voxtrack_core::error::AppError;

/// HTTP-facing wrapper around [`AppError`].
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl ApiError {
    /// Status code this error is served with.
    pub fn status(&self) -> StatusCode {
        if self.0.kind.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), format!("{}\n", self.0.message)).into_response()
    }
}
