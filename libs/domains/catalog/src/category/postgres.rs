use async_trait::async_trait;
use database::{DatabaseError, DatabaseResult, Page, PageRequest, Transaction};
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder,
};
use std::collections::{BTreeMap, BTreeSet};
use tracing::info;

use super::entity;
use super::models::{Category, CategorySort};
use super::repository::CategoryRepository;
use crate::sorting::resolve;

/// PostgreSQL category repository. Stateless: statements run on the
/// connection of the transaction passed to each call.
#[derive(Debug, Clone, Copy, Default)]
pub struct PgCategoryRepository;

impl PgCategoryRepository {
    pub fn new() -> Self {
        Self
    }
}

/// Loads the categories with the given ids, keyed by id.
pub(crate) async fn load_categories<C: ConnectionTrait>(
    conn: &C,
    ids: impl IntoIterator<Item = i64>,
) -> DatabaseResult<BTreeMap<i64, Category>> {
    let ids: BTreeSet<i64> = ids.into_iter().collect();
    if ids.is_empty() {
        return Ok(BTreeMap::new());
    }

    let models = entity::Entity::find()
        .filter(entity::Column::Id.is_in(ids))
        .all(conn)
        .await?;

    Ok(models
        .into_iter()
        .map(|model| (model.id, Category::from(model)))
        .collect())
}

#[async_trait]
impl CategoryRepository for PgCategoryRepository {
    async fn find_by_id(&self, tx: &Transaction, id: i64) -> DatabaseResult<Option<Category>> {
        let model = entity::Entity::find_by_id(id).one(tx.connection()?).await?;
        Ok(model.map(Category::from))
    }

    async fn find_page(
        &self,
        tx: &Transaction,
        request: &PageRequest,
    ) -> DatabaseResult<Page<Category>> {
        let conn = tx.connection()?;

        let (key, direction) = resolve::<CategorySort>(request.sort.as_ref(), "category");
        let column = match key {
            CategorySort::Id => entity::Column::Id,
            CategorySort::Name => entity::Column::Name,
        };

        let paginator = entity::Entity::find()
            .order_by(column, direction.into())
            .order_by_asc(entity::Column::Id)
            .paginate(conn, request.size);
        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(request.page).await?;

        Ok(Page::new(
            models.into_iter().map(Category::from).collect(),
            request,
            total,
        ))
    }

    async fn save(&self, tx: &Transaction, category: Category) -> DatabaseResult<Category> {
        tx.ensure_writable()?;
        let conn = tx.connection()?;

        let active = entity::ActiveModel {
            id: category.id.map_or(NotSet, Set),
            name: Set(category.name),
        };
        let model = match category.id {
            None => active.insert(conn).await?,
            Some(_) => active.update(conn).await?,
        };

        info!(category_id = model.id, "Saved category");
        Ok(model.into())
    }

    async fn delete_by_id(&self, tx: &Transaction, id: i64) -> DatabaseResult<()> {
        tx.ensure_writable()?;
        let result = entity::Entity::delete_by_id(id)
            .exec(tx.connection()?)
            .await?;

        if result.rows_affected == 0 {
            return Err(DatabaseError::NothingDeleted { id });
        }

        info!(category_id = id, "Deleted category");
        Ok(())
    }
}
