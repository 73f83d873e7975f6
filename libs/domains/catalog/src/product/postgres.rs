use async_trait::async_trait;
use database::{DatabaseError, DatabaseResult, Page, PageRequest, Transaction};
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, QueryTrait,
};
use std::collections::{BTreeMap, BTreeSet};
use tracing::info;

use super::models::{Product, ProductFilter, ProductSort};
use super::repository::ProductRepository;
use super::{entity, link};
use crate::category::{Category, postgres::load_categories};
use crate::sorting::resolve;

/// PostgreSQL product repository
#[derive(Debug, Clone, Copy, Default)]
pub struct PgProductRepository;

impl PgProductRepository {
    pub fn new() -> Self {
        Self
    }
}

/// Escapes LIKE wildcards and wraps the fragment for a substring match.
fn like_pattern(fragment: &str) -> String {
    let escaped = fragment
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

/// Categories linked to each of `product_ids`
async fn linked_categories<C: ConnectionTrait>(
    conn: &C,
    product_ids: Vec<i64>,
) -> DatabaseResult<BTreeMap<i64, BTreeSet<Category>>> {
    if product_ids.is_empty() {
        return Ok(BTreeMap::new());
    }

    let links = link::Entity::find()
        .filter(link::Column::ProductId.is_in(product_ids))
        .all(conn)
        .await?;
    let categories = load_categories(conn, links.iter().map(|l| l.category_id)).await?;

    let mut grouped: BTreeMap<i64, BTreeSet<Category>> = BTreeMap::new();
    for link in links {
        if let Some(category) = categories.get(&link.category_id) {
            grouped
                .entry(link.product_id)
                .or_default()
                .insert(category.clone());
        }
    }
    Ok(grouped)
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn find_by_id(&self, tx: &Transaction, id: i64) -> DatabaseResult<Option<Product>> {
        let conn = tx.connection()?;
        let Some(model) = entity::Entity::find_by_id(id).one(conn).await? else {
            return Ok(None);
        };

        let mut linked = linked_categories(conn, vec![id]).await?;
        let categories = linked.remove(&id).unwrap_or_default();
        Ok(Some(model.into_product(categories)))
    }

    async fn find_page(
        &self,
        tx: &Transaction,
        filter: &ProductFilter,
        request: &PageRequest,
    ) -> DatabaseResult<Page<Product>> {
        let conn = tx.connection()?;

        let (key, direction) = resolve::<ProductSort>(request.sort.as_ref(), "product");
        let column = match key {
            ProductSort::Id => entity::Column::Id,
            ProductSort::Name => entity::Column::Name,
            ProductSort::Price => entity::Column::Price,
            ProductSort::Date => entity::Column::Date,
        };

        let mut query = entity::Entity::find()
            .order_by(column, direction.into())
            .order_by_asc(entity::Column::Id);

        if let Some(fragment) = filter.name_fragment() {
            query = query.filter(Expr::cust_with_values(
                r#"LOWER("products"."name") LIKE $1 ESCAPE '\'"#,
                [like_pattern(&fragment)],
            ));
        }

        if let Some(category_id) = filter.category_id {
            query = query.filter(
                entity::Column::Id.in_subquery(
                    link::Entity::find()
                        .select_only()
                        .column(link::Column::ProductId)
                        .filter(link::Column::CategoryId.eq(category_id))
                        .into_query(),
                ),
            );
        }

        let paginator = query.paginate(conn, request.size);
        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(request.page).await?;

        let mut linked = linked_categories(conn, models.iter().map(|m| m.id).collect()).await?;
        let content = models
            .into_iter()
            .map(|model| {
                let categories = linked.remove(&model.id).unwrap_or_default();
                model.into_product(categories)
            })
            .collect();

        Ok(Page::new(content, request, total))
    }

    async fn save(&self, tx: &Transaction, product: Product) -> DatabaseResult<Product> {
        tx.ensure_writable()?;
        let conn = tx.connection()?;
        let category_ids = product.category_ids();

        let active = entity::ActiveModel {
            id: product.id.map_or(NotSet, Set),
            name: Set(product.name),
            description: Set(product.description),
            price: Set(product.price),
            img_url: Set(product.img_url),
            date: Set(product.date),
        };
        let model = match product.id {
            None => active.insert(conn).await?,
            Some(_) => active.update(conn).await?,
        };

        link::Entity::delete_many()
            .filter(link::Column::ProductId.eq(model.id))
            .exec(conn)
            .await?;

        if !category_ids.is_empty() {
            let rows = category_ids.iter().map(|&category_id| link::ActiveModel {
                product_id: Set(model.id),
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

        info!(product_id = model.id, "Saved product");
        Ok(model.into_product(categories))
    }

    async fn delete_by_id(&self, tx: &Transaction, id: i64) -> DatabaseResult<()> {
        tx.ensure_writable()?;
        let result = entity::Entity::delete_by_id(id)
            .exec(tx.connection()?)
            .await?;

        if result.rows_affected == 0 {
            return Err(DatabaseError::NothingDeleted { id });
        }

        info!(product_id = id, "Deleted product");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use database::AccessMode;
    use sea_orm::{DatabaseBackend, MockDatabase, Value};
    use std::collections::BTreeMap;

    #[tokio::test]
    async fn test_page_far_past_the_end_is_empty() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[BTreeMap::from([("num_items", Value::BigInt(Some(25)))])]])
            .append_query_results([Vec::<entity::Model>::new()])
            .into_connection();
        let tx = Transaction::begin(&db, AccessMode::ReadOnly).await.unwrap();
        let request = PageRequest::new(u64::MAX, 20);

        let page = PgProductRepository::new()
            .find_page(&tx, &ProductFilter::default(), &request)
            .await
            .unwrap();

        assert!(page.is_empty());
        assert_eq!(page.total_elements, 25);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.number, request.page);
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("phone"), "%phone%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(like_pattern("a\\b"), "%a\\\\b%");
    }

    #[tokio::test]
    async fn test_save_needs_writable_scope() {
        let tx = Transaction::detached(AccessMode::ReadOnly);
        let result = PgProductRepository::new()
            .save(&tx, Product::default())
            .await;

        assert!(matches!(result, Err(DatabaseError::ReadOnlyTransaction)));
    }
}
