use database::{AccessMode, Page, PageRequest, Transaction, UnitOfWork};
use std::sync::Arc;
use tracing::instrument;

use super::models::{User, UserDetailsDto, UserDto};
use super::repository::UserRepository;
use crate::category::{CategoryRepository, service::resolve_categories};
use crate::error::{CatalogError, CatalogResult};

const KIND: &str = "User";

/// User service. Same transaction discipline as the product service.
pub struct UserService<R, C, U>
where
    R: UserRepository,
    C: CategoryRepository,
    U: UnitOfWork,
{
    users: Arc<R>,
    categories: Arc<C>,
    uow: Arc<U>,
}

impl<R, C, U> UserService<R, C, U>
where
    R: UserRepository,
    C: CategoryRepository,
    U: UnitOfWork,
{
    pub fn new(users: R, categories: C, uow: U) -> Self {
        Self {
            users: Arc::new(users),
            categories: Arc::new(categories),
            uow: Arc::new(uow),
        }
    }

    #[instrument(skip(self))]
    pub async fn list_paged(&self, request: PageRequest) -> CatalogResult<Page<UserDto>> {
        let tx = self.uow.begin(AccessMode::ReadOnly).await?;
        let page = self.users.find_page(&tx, &request).await?;
        tx.commit().await?;
        Ok(page.map(UserDto::from))
    }

    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: i64) -> CatalogResult<UserDetailsDto> {
        let tx = self.uow.begin(AccessMode::ReadOnly).await?;
        let user = self
            .users
            .find_by_id(&tx, id)
            .await?
            .ok_or_else(|| CatalogError::not_found(KIND, id))?;
        tx.commit().await?;
        Ok(UserDetailsDto::from(&user))
    }

    #[instrument(skip(self, dto), fields(name = %dto.name))]
    pub async fn create(&self, dto: UserDetailsDto) -> CatalogResult<UserDto> {
        let tx = self.uow.begin(AccessMode::ReadWrite).await?;

        let mut user = User::default();
        self.copy_dto_to_entity(&tx, &dto, &mut user).await?;
        let saved = self.users.save(&tx, user).await?;

        tx.commit().await?;
        Ok(saved.into())
    }

    #[instrument(skip(self, dto))]
    pub async fn update(&self, id: i64, dto: UserDetailsDto) -> CatalogResult<UserDto> {
        let tx = self.uow.begin(AccessMode::ReadWrite).await?;

        let mut user = self
            .users
            .find_by_id(&tx, id)
            .await?
            .ok_or_else(|| CatalogError::not_found(KIND, id))?;
        self.copy_dto_to_entity(&tx, &dto, &mut user).await?;
        let saved = self.users.save(&tx, user).await?;

        tx.commit().await?;
        Ok(saved.into())
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> CatalogResult<()> {
        let tx = self.uow.begin(AccessMode::ReadWrite).await?;
        self.users
            .delete_by_id(&tx, id)
            .await
            .map_err(|e| CatalogError::from_delete(KIND, e))?;
        tx.commit().await?;
        Ok(())
    }

    async fn copy_dto_to_entity(
        &self,
        tx: &Transaction,
        dto: &UserDetailsDto,
        user: &mut User,
    ) -> CatalogResult<()> {
        user.copy_scalars(dto);
        user.categories =
            resolve_categories(self.categories.as_ref(), tx, &dto.categories).await?;
        Ok(())
    }
}

impl<R, C, U> Clone for UserService<R, C, U>
where
    R: UserRepository,
    C: CategoryRepository,
    U: UnitOfWork,
{
    fn clone(&self) -> Self {
        Self {
            users: Arc::clone(&self.users),
            categories: Arc::clone(&self.categories),
            uow: Arc::clone(&self.uow),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::{Category, CategoryDto, repository::MockCategoryRepository};
    use crate::user::repository::MockUserRepository;
    use chrono::{TimeZone, Utc};
    use database::DetachedUnitOfWork;
    use mockall::predicate::{always, eq};

    fn input(categories: Vec<CategoryDto>) -> UserDetailsDto {
        UserDetailsDto {
            id: None,
            name: "Maria".into(),
            bio: "Reads a lot".into(),
            registered_at: Utc.with_ymd_and_hms(2021, 3, 1, 12, 0, 0).unwrap(),
            avatar_url: String::new(),
            balance: 12.5,
            categories,
        }
    }

    #[tokio::test]
    async fn test_create_resolves_followed_categories() {
        let mut categories = MockCategoryRepository::new();
        categories
            .expect_find_by_id()
            .with(always(), eq(1))
            .returning(|_, id| Ok(Some(Category::new(id, "Books"))));

        let mut users = MockUserRepository::new();
        users
            .expect_save()
            .withf(|_, user| {
                user.categories.iter().map(|c| c.name.as_str()).eq(["Books"])
                    && user.balance == 12.5
            })
            .returning(|_, mut user| {
                user.id = Some(1);
                Ok(user)
            });

        let service = UserService::new(users, categories, DetachedUnitOfWork);
        let reference = CategoryDto {
            id: Some(1),
            name: "ignored".into(),
        };
        let created = service.create(input(vec![reference])).await.unwrap();

        assert_eq!(created.id, Some(1));
        assert_eq!(created.bio, "Reads a lot");
    }

    #[tokio::test]
    async fn test_update_missing_user_is_not_found() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .with(always(), eq(5))
            .returning(|_, _| Ok(None));
        users.expect_save().never();

        let service = UserService::new(users, MockCategoryRepository::new(), DetachedUnitOfWork);
        let err = service.update(5, input(Vec::new())).await.unwrap_err();
        assert_eq!(err.to_string(), "User not found: 5");
    }

    #[tokio::test]
    async fn test_delete_missing_user_is_not_found() {
        let mut users = MockUserRepository::new();
        users
            .expect_delete_by_id()
            .returning(|_, id| Err(database::DatabaseError::NothingDeleted { id }));

        let service = UserService::new(users, MockCategoryRepository::new(), DetachedUnitOfWork);
        assert!(matches!(
            service.delete(9).await,
            Err(CatalogError::NotFound(_))
        ));
    }
}
