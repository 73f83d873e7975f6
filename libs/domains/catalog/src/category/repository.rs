use async_trait::async_trait;
use database::{DatabaseResult, Page, PageRequest, Transaction};

use super::models::Category;

/// Persistence gateway for categories.
///
/// Every call runs inside the caller's transaction scope.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn find_by_id(&self, tx: &Transaction, id: i64) -> DatabaseResult<Option<Category>>;

    /// One page of categories, ordered by `request.sort` (id when absent)
    async fn find_page(
        &self,
        tx: &Transaction,
        request: &PageRequest,
    ) -> DatabaseResult<Page<Category>>;

    /// Inserts when `id` is `None`, updates otherwise. Returns the stored row.
    async fn save(&self, tx: &Transaction, category: Category) -> DatabaseResult<Category>;

    /// Fails with `NothingDeleted` when no row has `id`, and with
    /// `IntegrityViolation` while a product or user still references it.
    async fn delete_by_id(&self, tx: &Transaction, id: i64) -> DatabaseResult<()>;
}
