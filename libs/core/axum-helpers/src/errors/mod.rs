pub mod handlers;
pub mod responses;

use axum::{
    Json,
    extract::{
        Request,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, header::CONTENT_LENGTH},
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use thiserror::Error;
use utoipa::ToSchema;
use validator::{ValidationErrors, ValidationErrorsKind};

/// Error labels written to the `error` field
pub mod labels {
    pub const NOT_FOUND: &str = "Resource not found";
    pub const DATABASE: &str = "Database exception";
    pub const VALIDATION: &str = "Validation exception";
    pub const BAD_REQUEST: &str = "Bad request";
    pub const INTERNAL: &str = "Internal server error";
}

/// One violated constraint of a request payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldError {
    /// Dotted path of the field, e.g. `categories[0].id`
    pub field: String,
    pub message: String,
}

/// Body of every error response.
///
/// ```json
/// {
///   "timestamp": "2024-03-01T10:15:30Z",
///   "status": 404,
///   "error": "Resource not found",
///   "message": "Product 1000 not found",
///   "path": "/api/products/1000"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct StandardError {
    pub timestamp: DateTime<Utc>,
    pub status: u16,
    pub error: String,
    pub message: String,
    /// Request path, filled in by [`record_error_path`]
    pub path: String,
    /// Per-field violations, present only for validation failures
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
}

impl StandardError {
    pub fn new(status: StatusCode, error: &str, message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            status: status.as_u16(),
            error: error.to_string(),
            message: message.into(),
            path: String::new(),
            errors: Vec::new(),
        }
    }

    pub fn with_errors(mut self, errors: Vec<FieldError>) -> Self {
        self.errors = errors;
        self
    }
}

/// Errors a handler can return; the single place mapping error kinds to HTTP statuses.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database conflict: {0}")]
    DatabaseConflict(String),

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("JSON extraction error: {0}")]
    JsonRejection(#[from] JsonRejection),

    #[error("Query string error: {0}")]
    QueryRejection(#[from] QueryRejection),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::DatabaseConflict(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::JsonRejection(rejection) => rejection.status(),
            AppError::QueryRejection(rejection) => rejection.status(),
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Builds the response body; `path` is left empty.
    pub fn to_standard_error(&self) -> StandardError {
        let status = self.status();
        match self {
            AppError::NotFound(msg) => StandardError::new(status, labels::NOT_FOUND, msg.clone()),
            AppError::DatabaseConflict(msg) => {
                StandardError::new(status, labels::DATABASE, msg.clone())
            }
            AppError::Validation(errors) => {
                StandardError::new(status, labels::VALIDATION, "Request validation failed")
                    .with_errors(field_errors(errors))
            }
            AppError::JsonRejection(rejection) => {
                StandardError::new(status, labels::BAD_REQUEST, rejection.body_text())
            }
            AppError::QueryRejection(rejection) => {
                StandardError::new(status, labels::BAD_REQUEST, rejection.body_text())
            }
            AppError::BadRequest(msg) => {
                StandardError::new(status, labels::BAD_REQUEST, msg.clone())
            }
            AppError::Internal(_) => StandardError::new(
                status,
                labels::INTERNAL,
                "An internal server error occurred",
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Internal(details) => tracing::error!(%details, "Internal server error"),
            AppError::DatabaseConflict(msg) => tracing::warn!(%msg, "Database conflict"),
            AppError::Validation(errors) => tracing::info!(?errors, "Validation failed"),
            other => tracing::info!(error = %other, "Request failed"),
        }

        let body = self.to_standard_error();
        let mut response = (self.status(), Json(body.clone())).into_response();
        response.extensions_mut().insert(body);
        response
    }
}

/// Flattens validator output into one entry per violated constraint, ordered by field.
pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut out = Vec::new();
    collect_field_errors(errors, None, &mut out);
    out.sort_by(|a, b| a.field.cmp(&b.field).then_with(|| a.message.cmp(&b.message)));
    out
}

fn collect_field_errors(
    errors: &ValidationErrors,
    prefix: Option<&str>,
    out: &mut Vec<FieldError>,
) {
    for (name, kind) in errors.errors() {
        let field = match prefix {
            Some(prefix) => format!("{prefix}.{name}"),
            None => name.to_string(),
        };

        match kind {
            ValidationErrorsKind::Field(violations) => {
                out.extend(violations.iter().map(|violation| FieldError {
                    field: field.clone(),
                    message: violation
                        .message
                        .clone()
                        .unwrap_or_else(|| Cow::Owned(violation.code.to_string()))
                        .into_owned(),
                }));
            }
            ValidationErrorsKind::Struct(nested) => {
                collect_field_errors(nested, Some(&field), out);
            }
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    collect_field_errors(nested, Some(&format!("{field}[{index}]")), out);
                }
            }
        }
    }
}

/// Middleware filling [`StandardError::path`] with the request path.
///
/// Layer it on the outermost router so nested routers report full paths.
pub async fn record_error_path(request: Request, next: Next) -> Response {
    let path = request.uri().path().to_owned();
    let mut response = next.run(request).await;

    match response.extensions_mut().remove::<StandardError>() {
        Some(mut body) => {
            body.path = path;
            let (mut parts, _) = response.into_parts();
            parts.headers.remove(CONTENT_LENGTH);
            (parts, Json(body)).into_response()
        }
        None => response,
    }
}
