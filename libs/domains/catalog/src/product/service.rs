//! Product service
//!
//! Reads run in a read-only scope, writes in a read-write scope; every
//! gateway call of one operation shares that scope, which commits only once
//! the operation has succeeded.

use database::{AccessMode, Page, PageRequest, Transaction, UnitOfWork};
use std::sync::Arc;
use tracing::instrument;

use super::models::{Product, ProductDetailsDto, ProductDto, ProductFilter};
use super::repository::ProductRepository;
use crate::category::{CategoryRepository, service::resolve_categories};
use crate::error::{CatalogError, CatalogResult};

const KIND: &str = "Product";

pub struct ProductService<P, C, U>
where
    P: ProductRepository,
    C: CategoryRepository,
    U: UnitOfWork,
{
    products: Arc<P>,
    categories: Arc<C>,
    uow: Arc<U>,
}

impl<P, C, U> ProductService<P, C, U>
where
    P: ProductRepository,
    C: CategoryRepository,
    U: UnitOfWork,
{
    pub fn new(products: P, categories: C, uow: U) -> Self {
        Self {
            products: Arc::new(products),
            categories: Arc::new(categories),
            uow: Arc::new(uow),
        }
    }

    #[instrument(skip(self))]
    pub async fn list_paged(
        &self,
        filter: ProductFilter,
        request: PageRequest,
    ) -> CatalogResult<Page<ProductDto>> {
        let tx = self.uow.begin(AccessMode::ReadOnly).await?;
        let page = self.products.find_page(&tx, &filter, &request).await?;
        tx.commit().await?;
        Ok(page.map(ProductDto::from))
    }

    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: i64) -> CatalogResult<ProductDetailsDto> {
        let tx = self.uow.begin(AccessMode::ReadOnly).await?;
        let product = self
            .products
            .find_by_id(&tx, id)
            .await?
            .ok_or_else(|| CatalogError::not_found(KIND, id))?;
        tx.commit().await?;
        Ok(ProductDetailsDto::from(&product))
    }

    #[instrument(skip(self, dto), fields(name = %dto.name))]
    pub async fn create(&self, dto: ProductDetailsDto) -> CatalogResult<ProductDto> {
        let tx = self.uow.begin(AccessMode::ReadWrite).await?;

        let mut product = Product::default();
        self.copy_dto_to_entity(&tx, &dto, &mut product).await?;
        let saved = self.products.save(&tx, product).await?;

        tx.commit().await?;
        Ok(saved.into())
    }

    #[instrument(skip(self, dto))]
    pub async fn update(&self, id: i64, dto: ProductDetailsDto) -> CatalogResult<ProductDto> {
        let tx = self.uow.begin(AccessMode::ReadWrite).await?;

        let mut product = self
            .products
            .find_by_id(&tx, id)
            .await?
            .ok_or_else(|| CatalogError::not_found(KIND, id))?;
        self.copy_dto_to_entity(&tx, &dto, &mut product).await?;
        let saved = self.products.save(&tx, product).await?;

        tx.commit().await?;
        Ok(saved.into())
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> CatalogResult<()> {
        let tx = self.uow.begin(AccessMode::ReadWrite).await?;
        self.products
            .delete_by_id(&tx, id)
            .await
            .map_err(|e| CatalogError::from_delete(KIND, e))?;
        tx.commit().await?;
        Ok(())
    }

    /// Copies the scalars and replaces the category set with the resolved references.
    async fn copy_dto_to_entity(
        &self,
        tx: &Transaction,
        dto: &ProductDetailsDto,
        product: &mut Product,
    ) -> CatalogResult<()> {
        product.copy_scalars(dto);
        product.categories =
            resolve_categories(self.categories.as_ref(), tx, &dto.categories).await?;
        Ok(())
    }
}

impl<P, C, U> Clone for ProductService<P, C, U>
where
    P: ProductRepository,
    C: CategoryRepository,
    U: UnitOfWork,
{
    fn clone(&self) -> Self {
        Self {
            products: Arc::clone(&self.products),
            categories: Arc::clone(&self.categories),
            uow: Arc::clone(&self.uow),
        }
    }
}
