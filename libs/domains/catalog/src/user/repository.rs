use async_trait::async_trait;
use database::{DatabaseResult, Page, PageRequest, Transaction};

use super::models::User;

/// Persistence gateway for users and the categories they follow
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, tx: &Transaction, id: i64) -> DatabaseResult<Option<User>>;

    async fn find_page(&self, tx: &Transaction, request: &PageRequest)
    -> DatabaseResult<Page<User>>;

    async fn save(&self, tx: &Transaction, user: User) -> DatabaseResult<User>;

    async fn delete_by_id(&self, tx: &Transaction, id: i64) -> DatabaseResult<()>;
}
