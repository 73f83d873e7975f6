//! Persistence building blocks for the catalog.
//!
//! - [`DatabaseError`]: the gateway error type, including the `NothingDeleted`
//!   and `IntegrityViolation` signals services classify
//! - [`transaction`]: transaction scopes and the [`UnitOfWork`] that opens them
//! - [`pagination`]: page requests, sorting and result pages
//! - [`postgres`] (default feature): connection pool, retrying connector,
//!   migrations runner and health check
//!
//! ```ignore
//! use database::postgres::{self, PostgresConfig};
//! use database::{AccessMode, UnitOfWork};
//!
//! let db = postgres::connect_from_config_with_retry(PostgresConfig::from_env()?, None).await?;
//! postgres::run_migrations::<Migrator>(&db, "catalog_api").await?;
//! let tx = db.begin(AccessMode::ReadOnly).await?;
//! ```

pub mod common;
pub mod pagination;
pub mod transaction;

#[cfg(feature = "postgres")]
pub mod postgres;

pub use common::{DatabaseError, DatabaseResult, RetryConfig};
pub use pagination::{Direction, Page, PageQuery, PageRequest, Sort};
pub use transaction::{AccessMode, DetachedUnitOfWork, Transaction, UnitOfWork};
