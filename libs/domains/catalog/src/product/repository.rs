use async_trait::async_trait;
use database::{DatabaseResult, Page, PageRequest, Transaction};

use super::models::{Product, ProductFilter};

/// Persistence gateway for products and their category links
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// The product with its categories, or `None`
    async fn find_by_id(&self, tx: &Transaction, id: i64) -> DatabaseResult<Option<Product>>;

    /// One page of the products matching `filter`
    async fn find_page(
        &self,
        tx: &Transaction,
        filter: &ProductFilter,
        request: &PageRequest,
    ) -> DatabaseResult<Page<Product>>;

    /// Inserts or updates the product and replaces its category links.
    async fn save(&self, tx: &Transaction, product: Product) -> DatabaseResult<Product>;

    /// Fails with `NothingDeleted` when no row has `id`.
    async fn delete_by_id(&self, tx: &Transaction, id: i64) -> DatabaseResult<()>;
}
