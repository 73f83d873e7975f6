//! Shared application state.
//!
//! Cloned into the readiness router and the shutdown cleanup; the connection
//! pool is an `Arc` internally, so clones share it.

/// Configuration plus the PostgreSQL pool every catalog service runs on.
#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    pub db: database::postgres::DatabaseConnection,
}
