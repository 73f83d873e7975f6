//! Categories: the flat entity products and users link to.

pub mod entity;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use handlers::{ApiDoc, router};
pub(crate) use models::CategorySort;
pub use models::{Category, CategoryDto};
pub use postgres::PgCategoryRepository;
pub use repository::CategoryRepository;
pub use service::CategoryService;
