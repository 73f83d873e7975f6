use axum::{http::Uri, response::Response};
use axum::response::IntoResponse;

use super::AppError;

/// Fallback for routes that do not exist.
pub async fn not_found(uri: Uri) -> Response {
    AppError::NotFound(format!("No route for {}", uri.path())).into_response()
}
