//! Products and their category memberships.

pub mod entity;
pub mod handlers;
pub mod link;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use handlers::{ApiDoc, router};
pub(crate) use models::ProductSort;
pub use models::{Product, ProductDetailsDto, ProductDto, ProductFilter};
pub use postgres::PgProductRepository;
pub use repository::ProductRepository;
pub use service::ProductService;
