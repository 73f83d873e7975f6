//! Reusable OpenAPI responses for the error body.

use super::StandardError;
#[allow(unused_imports)]
use serde_json::json;
use utoipa::ToResponse;

#[derive(ToResponse)]
#[response(
    description = "Resource not found",
    content_type = "application/json",
    example = json!({
        "timestamp": "2024-03-01T10:15:30Z",
        "status": 404,
        "error": "Resource not found",
        "message": "Product 1000 not found",
        "path": "/api/products/1000"
    })
)]
pub struct NotFoundResponse(pub StandardError);

#[derive(ToResponse)]
#[response(
    description = "Referential conflict in the database",
    content_type = "application/json",
    example = json!({
        "timestamp": "2024-03-01T10:15:30Z",
        "status": 400,
        "error": "Database exception",
        "message": "Category 1 is still referenced",
        "path": "/api/categories/1"
    })
)]
pub struct DatabaseConflictResponse(pub StandardError);

#[derive(ToResponse)]
#[response(
    description = "Malformed id or request body",
    content_type = "application/json",
    example = json!({
        "timestamp": "2024-03-01T10:15:30Z",
        "status": 400,
        "error": "Bad request",
        "message": "Invalid id: abc",
        "path": "/api/products/abc"
    })
)]
pub struct BadRequestResponse(pub StandardError);

#[derive(ToResponse)]
#[response(
    description = "Request payload failed validation",
    content_type = "application/json",
    example = json!({
        "timestamp": "2024-03-01T10:15:30Z",
        "status": 422,
        "error": "Validation exception",
        "message": "Request validation failed",
        "path": "/api/products",
        "errors": [
            { "field": "name", "message": "Name must have between 5 and 60 characters" },
            { "field": "price", "message": "Price must be positive" }
        ]
    })
)]
pub struct ValidationErrorResponse(pub StandardError);

#[derive(ToResponse)]
#[response(
    description = "Internal Server Error",
    content_type = "application/json",
    example = json!({
        "timestamp": "2024-03-01T10:15:30Z",
        "status": 500,
        "error": "Internal server error",
        "message": "An internal server error occurred",
        "path": "/api/products"
    })
)]
pub struct InternalServerErrorResponse(pub StandardError);
