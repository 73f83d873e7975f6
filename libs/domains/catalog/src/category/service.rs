//! Category service: paging, lookup, and field-copy writes.

use database::{AccessMode, Page, PageRequest, Transaction, UnitOfWork};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::instrument;

use super::models::{Category, CategoryDto};
use super::repository::CategoryRepository;
use crate::error::{CatalogError, CatalogResult};

const KIND: &str = "Category";

/// Resolves each referenced category through `repository`.
///
/// Fails with `NotFound` on the first id the store does not know.
pub(crate) async fn resolve_categories<C: CategoryRepository + ?Sized>(
    repository: &C,
    tx: &Transaction,
    references: &[CategoryDto],
) -> CatalogResult<BTreeSet<Category>> {
    let mut resolved = BTreeSet::new();
    for reference in references {
        let Some(id) = reference.id else {
            return Err(CatalogError::NotFound(
                "Category reference without id".to_string(),
            ));
        };
        let category = repository
            .find_by_id(tx, id)
            .await?
            .ok_or_else(|| CatalogError::not_found(KIND, id))?;
        resolved.insert(category);
    }
    Ok(resolved)
}

pub struct CategoryService<C: CategoryRepository, U: UnitOfWork> {
    repository: Arc<C>,
    uow: Arc<U>,
}

impl<C: CategoryRepository, U: UnitOfWork> CategoryService<C, U> {
    pub fn new(repository: C, uow: U) -> Self {
        Self {
            repository: Arc::new(repository),
            uow: Arc::new(uow),
        }
    }

    #[instrument(skip(self))]
    pub async fn list_paged(&self, request: PageRequest) -> CatalogResult<Page<CategoryDto>> {
        let tx = self.uow.begin(AccessMode::ReadOnly).await?;
        let page = self.repository.find_page(&tx, &request).await?;
        tx.commit().await?;
        Ok(page.map(CategoryDto::from))
    }

    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: i64) -> CatalogResult<CategoryDto> {
        let tx = self.uow.begin(AccessMode::ReadOnly).await?;
        let category = self
            .repository
            .find_by_id(&tx, id)
            .await?
            .ok_or_else(|| CatalogError::not_found(KIND, id))?;
        tx.commit().await?;
        Ok(category.into())
    }

    #[instrument(skip(self, dto), fields(name = %dto.name))]
    pub async fn create(&self, dto: CategoryDto) -> CatalogResult<CategoryDto> {
        let tx = self.uow.begin(AccessMode::ReadWrite).await?;

        let mut category = Category::default();
        category.copy_from(dto);
        let saved = self.repository.save(&tx, category).await?;

        tx.commit().await?;
        Ok(saved.into())
    }

    #[instrument(skip(self, dto))]
    pub async fn update(&self, id: i64, dto: CategoryDto) -> CatalogResult<CategoryDto> {
        let tx = self.uow.begin(AccessMode::ReadWrite).await?;

        let mut category = self
            .repository
            .find_by_id(&tx, id)
            .await?
            .ok_or_else(|| CatalogError::not_found(KIND, id))?;
        category.copy_from(dto);
        let saved = self.repository.save(&tx, category).await?;

        tx.commit().await?;
        Ok(saved.into())
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> CatalogResult<()> {
        let tx = self.uow.begin(AccessMode::ReadWrite).await?;
        self.repository
            .delete_by_id(&tx, id)
            .await
            .map_err(|e| CatalogError::from_delete(KIND, e))?;
        tx.commit().await?;
        Ok(())
    }
}

impl<C: CategoryRepository, U: UnitOfWork> Clone for CategoryService<C, U> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            uow: Arc::clone(&self.uow),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::repository::MockCategoryRepository;
    use database::{DatabaseError, DetachedUnitOfWork};
    use mockall::predicate::{always, eq};

    const EXISTING_ID: i64 = 1;
    const NON_EXISTING_ID: i64 = 2;
    const DEPENDENT_ID: i64 = 3;

    fn service(
        repo: MockCategoryRepository,
    ) -> CategoryService<MockCategoryRepository, DetachedUnitOfWork> {
        CategoryService::new(repo, DetachedUnitOfWork)
    }

    fn dto(name: &str) -> CategoryDto {
        CategoryDto {
            id: None,
            name: name.into(),
        }
    }

    #[tokio::test]
    async fn test_delete_existing_succeeds() {
        let mut repo = MockCategoryRepository::new();
        repo.expect_delete_by_id()
            .with(always(), eq(EXISTING_ID))
            .times(1)
            .returning(|_, _| Ok(()));

        assert!(service(repo).delete(EXISTING_ID).await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let mut repo = MockCategoryRepository::new();
        repo.expect_delete_by_id()
            .with(always(), eq(NON_EXISTING_ID))
            .returning(|_, id| Err(DatabaseError::NothingDeleted { id }));

        let err = service(repo).delete(NON_EXISTING_ID).await.unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_referenced_is_conflict() {
        let mut repo = MockCategoryRepository::new();
        repo.expect_delete_by_id()
            .with(always(), eq(DEPENDENT_ID))
            .returning(|_, _| Err(DatabaseError::IntegrityViolation("fk_category".into())));

        let err = service(repo).delete(DEPENDENT_ID).await.unwrap_err();
        assert!(matches!(err, CatalogError::DatabaseConflict(_)));
    }

    #[tokio::test]
    async fn test_update_missing_never_saves() {
        let mut repo = MockCategoryRepository::new();
        repo.expect_find_by_id()
            .with(always(), eq(NON_EXISTING_ID))
            .returning(|_, _| Ok(None));
        repo.expect_save().never();

        let err = service(repo)
            .update(NON_EXISTING_ID, dto("Games"))
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_create_copies_name_only() {
        let mut repo = MockCategoryRepository::new();
        repo.expect_save()
            .withf(|_, category| category.id.is_none() && category.name == "Games")
            .returning(|_, mut category| {
                category.id = Some(4);
                Ok(category)
            });

        let mut input = dto("Games");
        input.id = Some(77);
        let created = service(repo).create(input).await.unwrap();
        assert_eq!(created.id, Some(4));
    }

    #[tokio::test]
    async fn test_list_forwards_page_metadata() {
        let mut repo = MockCategoryRepository::new();
        repo.expect_find_page().returning(|_, request| {
            Ok(Page::new(
                vec![Category::new(1, "Books")],
                request,
                41,
            ))
        });

        let page = service(repo)
            .list_paged(PageRequest::new(2, 20))
            .await
            .unwrap();
        assert_eq!(page.total_elements, 41);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.number, 2);
        assert_eq!(page.content[0].name, "Books");
    }

    #[tokio::test]
    async fn test_resolve_categories_reports_missing_id() {
        let mut repo = MockCategoryRepository::new();
        repo.expect_find_by_id()
            .with(always(), eq(EXISTING_ID))
            .returning(|_, id| Ok(Some(Category::new(id, "Books"))));
        repo.expect_find_by_id()
            .with(always(), eq(NON_EXISTING_ID))
            .returning(|_, _| Ok(None));

        let tx = Transaction::detached(AccessMode::ReadOnly);
        let references = [
            CategoryDto {
                id: Some(EXISTING_ID),
                name: String::new(),
            },
            CategoryDto {
                id: Some(NON_EXISTING_ID),
                name: String::new(),
            },
        ];

        let err = resolve_categories(&repo, &tx, &references).await.unwrap_err();
        assert_eq!(err.to_string(), "Category not found: 2");
    }
}
