use sea_orm::{DbErr, SqlErr};

/// Unified error type for the persistence gateway and its connectors.
///
/// `NothingDeleted` and `IntegrityViolation` are the two signals the domain
/// services classify; everything else propagates as an unclassified failure.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    /// PostgreSQL errors (SeaORM) not classified as integrity violations
    #[error("PostgreSQL error: {0}")]
    Postgres(DbErr),

    /// A delete matched no row
    #[error("No row with id {id} to delete")]
    NothingDeleted { id: i64 },

    /// The store rejected a write because of a referential or uniqueness constraint
    #[error("Integrity constraint violated: {0}")]
    IntegrityViolation(String),

    /// A write was attempted inside a read-only transaction
    #[error("Cannot write inside a read-only transaction")]
    ReadOnlyTransaction,

    /// A SQL repository was handed a transaction with no database connection
    #[error("Transaction is not bound to a database connection")]
    DetachedTransaction,

    /// Connection failed after retries
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Health check failed
    #[error("Health check failed: {0}")]
    HealthCheckFailed(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Migration error
    #[error("Migration error: {0}")]
    MigrationError(String),

    /// Generic database error
    #[error("Database error: {0}")]
    Generic(String),
}

impl From<DbErr> for DatabaseError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::ForeignKeyConstraintViolation(details))
            | Some(SqlErr::UniqueConstraintViolation(details)) => {
                DatabaseError::IntegrityViolation(details)
            }
            _ => DatabaseError::Postgres(err),
        }
    }
}

/// Result type alias for database operations
pub type DatabaseResult<T> = Result<T, DatabaseError>;
