use async_trait::async_trait;
use database::{DatabaseError, DatabaseResult, Page, PageRequest, Transaction};
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder,
};
use std::collections::{BTreeMap, BTreeSet};
use tracing::info;

use super::models::{User, UserSort};
use super::repository::UserRepository;
use super::{entity, link};
use crate::category::{Category, postgres::load_categories};
use crate::sorting::resolve;

/// PostgreSQL user repository
#[derive(Debug, Clone, Copy, Default)]
pub struct PgUserRepository;

impl PgUserRepository {
    pub fn new() -> Self {
        Self
    }
}

async fn followed_categories<C: ConnectionTrait>(
    conn: &C,
    user_ids: Vec<i64>,
) -> DatabaseResult<BTreeMap<i64, BTreeSet<Category>>> {
    if user_ids.is_empty() {
        return Ok(BTreeMap::new());
    }

    let links = link::Entity::find()
        .filter(link::Column::UserId.is_in(user_ids))
        .all(conn)
        .await?;
    let categories = load_categories(conn, links.iter().map(|l| l.category_id)).await?;

    let mut grouped: BTreeMap<i64, BTreeSet<Category>> = BTreeMap::new();
    for link in links {
        if let Some(category) = categories.get(&link.category_id) {
            grouped
                .entry(link.user_id)
                .or_default()
                .insert(category.clone());
        }
    }
    Ok(grouped)
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_id(&self, tx: &Transaction, id: i64) -> DatabaseResult<Option<User>> {
        let conn = tx.connection()?;
        let Some(model) = entity::Entity::find_by_id(id).one(conn).await? else {
            return Ok(None);
        };

        let mut followed = followed_categories(conn, vec![id]).await?;
        Ok(Some(model.into_user(followed.remove(&id).unwrap_or_default())))
    }

    async fn find_page(
        &self,
        tx: &Transaction,
        request: &PageRequest,
    ) -> DatabaseResult<Page<User>> {
        let conn = tx.connection()?;

        let (key, direction) = resolve::<UserSort>(request.sort.as_ref(), "user");
        let column = match key {
            UserSort::Id => entity::Column::Id,
            UserSort::Name => entity::Column::Name,
            UserSort::RegisteredAt => entity::Column::RegisteredAt,
            UserSort::Balance => entity::Column::Balance,
        };

        let paginator = entity::Entity::find()
            .order_by(column, direction.into())
            .order_by_asc(entity::Column::Id)
            .paginate(conn, request.size);
        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(request.page).await?;

        let mut followed = followed_categories(conn, models.iter().map(|m| m.id).collect()).await?;
        let content = models
            .into_iter()
            .map(|model| {
                let categories = followed.remove(&model.id).unwrap_or_default();
                model.into_user(categories)
            })
            .collect();

        Ok(Page::new(content, request, total))
    }

    async fn save(&self, tx: &Transaction, user: User) -> DatabaseResult<User> {
        tx.ensure_writable()?;
        let conn = tx.connection()?;
        let category_ids = user.category_ids();

        let active = entity::ActiveModel {
            id: user.id.map_or(NotSet, Set),
            name: Set(user.name),
            bio: Set(user.bio),
            registered_at: Set(user.registered_at),
            avatar_url: Set(user.avatar_url),
            balance: Set(user.balance),
        };
        let model = match user.id {
            None => active.insert(conn).await?,
            Some(_) => active.update(conn).await?,
        };

        link::Entity::delete_many()
            .filter(link::Column::UserId.eq(model.id))
            .exec(conn)
            .await?;

        if !category_ids.is_empty() {
            let rows = category_ids.iter().map(|&category_id| link::ActiveModel {
                user_id: Set(model.id),
                category_id: Set(category_id),
            });
            link::Entity::insert_many(rows)
                .exec_without_returning(conn)
                .await?;
        }

        let categories = load_categories(conn, category_ids)
            .await?
            .into_values()
            .collect();

        info!(user_id = model.id, "Saved user");
        Ok(model.into_user(categories))
    }

    async fn delete_by_id(&self, tx: &Transaction, id: i64) -> DatabaseResult<()> {
        tx.ensure_writable()?;
        let result = entity::Entity::delete_by_id(id)
            .exec(tx.connection()?)
            .await?;

        if result.rows_affected == 0 {
            return Err(DatabaseError::NothingDeleted { id });
        }

        info!(user_id = id, "Deleted user");
        Ok(())
    }
}
