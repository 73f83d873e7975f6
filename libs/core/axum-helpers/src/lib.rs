//! # Axum Helpers
//!
//! Shared building blocks for the catalog HTTP layer.
//!
//! - **[`errors`]**: [`AppError`], the translator from error kinds to HTTP
//!   statuses, and the [`StandardError`] body every failure uses
//! - **[`extractors`]**: [`ValidatedJson`], [`QueryParams`] and [`IdPath`]
//! - **[`server`]**: router assembly with Swagger UI, health endpoints,
//!   graceful shutdown

pub mod errors;
pub mod extractors;
pub mod server;

pub use errors::{AppError, FieldError, StandardError};
pub use extractors::{IdPath, QueryParams, ValidatedJson};
pub use server::{
    HealthCheckFuture, HealthResponse, ReadyResponse, ShutdownCoordinator, close_postgres,
    create_production_app, create_router, health_router, run_health_checks, shutdown_signal,
};
