//! Catalog domain: categories, products and users.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← axum routers, request validation
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← transaction scopes, DTO mapping, error kinds
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← gateway traits (PostgreSQL + in-memory)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← entities, lean and extended DTOs
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use database::DetachedUnitOfWork;
//! use domain_catalog::{InMemoryCatalog, product::{self, ProductService}};
//!
//! let catalog = InMemoryCatalog::new();
//! let service = ProductService::new(catalog.products(), catalog.categories(), DetachedUnitOfWork);
//! let router = product::router(service);
//! ```

pub mod category;
pub mod error;
pub(crate) mod http;
pub mod memory;
pub mod product;
pub(crate) mod sorting;
pub mod user;
pub(crate) mod validation;

pub use error::{CatalogError, CatalogResult};
pub use memory::{
    InMemoryCatalog, InMemoryCategoryRepository, InMemoryProductRepository,
    InMemoryUserRepository,
};
