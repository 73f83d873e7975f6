//! Users and the categories they follow.

pub mod entity;
pub mod handlers;
pub mod link;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use handlers::{ApiDoc, router};
pub use models::{User, UserDetailsDto, UserDto};
pub(crate) use models::UserSort;
pub use postgres::PgUserRepository;
pub use repository::UserRepository;
pub use service::UserService;
