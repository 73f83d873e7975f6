//! Transaction scopes handed to repositories.
//!
//! Every service operation opens one [`Transaction`] through a [`UnitOfWork`]
//! and passes it to each repository call it makes. The scope commits only when
//! [`Transaction::commit`] is called; dropping it rolls back.

use async_trait::async_trait;
use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};
use tracing::debug;

use crate::common::{DatabaseError, DatabaseResult};

/// Whether a transaction may write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    ReadOnly,
    ReadWrite,
}

impl From<AccessMode> for sea_orm::AccessMode {
    fn from(mode: AccessMode) -> Self {
        match mode {
            AccessMode::ReadOnly => sea_orm::AccessMode::ReadOnly,
            AccessMode::ReadWrite => sea_orm::AccessMode::ReadWrite,
        }
    }
}

/// A transaction scope.
///
/// Backed by a SeaORM [`DatabaseTransaction`] when opened on a connection, or
/// detached (mode only) for stores that have no database behind them.
pub struct Transaction {
    inner: Option<DatabaseTransaction>,
    mode: AccessMode,
}

impl Transaction {
    /// Opens a database transaction with the given access mode.
    pub async fn begin(db: &DatabaseConnection, mode: AccessMode) -> DatabaseResult<Self> {
        let inner = db.begin_with_config(None, Some(mode.into())).await?;
        debug!(?mode, "Transaction started");
        Ok(Self {
            inner: Some(inner),
            mode,
        })
    }

    /// A scope with no database connection, used by in-memory stores.
    pub fn detached(mode: AccessMode) -> Self {
        Self { inner: None, mode }
    }

    pub fn access_mode(&self) -> AccessMode {
        self.mode
    }

    pub fn is_read_only(&self) -> bool {
        self.mode == AccessMode::ReadOnly
    }

    /// Fails with [`DatabaseError::ReadOnlyTransaction`] unless the scope may write.
    pub fn ensure_writable(&self) -> DatabaseResult<()> {
        if self.is_read_only() {
            return Err(DatabaseError::ReadOnlyTransaction);
        }
        Ok(())
    }

    /// The SeaORM connection to run statements on.
    pub fn connection(&self) -> DatabaseResult<&DatabaseTransaction> {
        self.inner.as_ref().ok_or(DatabaseError::DetachedTransaction)
    }

    pub async fn commit(self) -> DatabaseResult<()> {
        if let Some(inner) = self.inner {
            inner.commit().await?;
            debug!(mode = ?self.mode, "Transaction committed");
        }
        Ok(())
    }
}

impl std::fmt::Debug for Transaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transaction")
            .field("mode", &self.mode)
            .field("attached", &self.inner.is_some())
            .finish()
    }
}

/// Opens transaction scopes for services.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    async fn begin(&self, mode: AccessMode) -> DatabaseResult<Transaction>;
}

#[async_trait]
impl UnitOfWork for DatabaseConnection {
    async fn begin(&self, mode: AccessMode) -> DatabaseResult<Transaction> {
        Transaction::begin(self, mode).await
    }
}

/// Unit of work for in-memory stores: every scope is detached.
#[derive(Debug, Clone, Copy, Default)]
pub struct DetachedUnitOfWork;

#[async_trait]
impl UnitOfWork for DetachedUnitOfWork {
    async fn begin(&self, mode: AccessMode) -> DatabaseResult<Transaction> {
        Ok(Transaction::detached(mode))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_detached_unit_of_work_keeps_mode() {
        let tx = DetachedUnitOfWork.begin(AccessMode::ReadWrite).await.unwrap();
        assert_eq!(tx.access_mode(), AccessMode::ReadWrite);
        assert!(tx.ensure_writable().is_ok());
        assert!(tx.commit().await.is_ok());
    }

    #[test]
    fn test_read_only_scope_rejects_writes() {
        let tx = Transaction::detached(AccessMode::ReadOnly);
        assert!(tx.is_read_only());
        assert!(matches!(
            tx.ensure_writable(),
            Err(DatabaseError::ReadOnlyTransaction)
        ));
    }

    #[test]
    fn test_detached_scope_has_no_connection() {
        let tx = Transaction::detached(AccessMode::ReadWrite);
        assert!(matches!(
            tx.connection(),
            Err(DatabaseError::DetachedTransaction)
        ));
    }

    #[test]
    fn test_access_mode_maps_to_sea_orm() {
        assert!(matches!(
            sea_orm::AccessMode::from(AccessMode::ReadOnly),
            sea_orm::AccessMode::ReadOnly
        ));
        assert!(matches!(
            sea_orm::AccessMode::from(AccessMode::ReadWrite),
            sea_orm::AccessMode::ReadWrite
        ));
    }
}
