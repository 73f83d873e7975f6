//! In-memory repositories sharing one set of tables.
//!
//! Category links are kept as ids and materialized on every read, so a
//! renamed category shows up under every product and user that references it.
//! Writes are applied immediately; dropping a transaction does not undo them.

use async_trait::async_trait;
use database::{DatabaseError, DatabaseResult, Page, PageRequest, Transaction};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use crate::category::{Category, CategoryRepository, CategorySort};
use crate::product::{Product, ProductFilter, ProductRepository, ProductSort};
use crate::sorting::{directed, resolve};
use crate::user::{User, UserRepository, UserSort};

/// Rows that reference categories
trait CategoryOwner: Clone {
    const KIND: &'static str;

    fn id(&self) -> Option<i64>;
    fn set_id(&mut self, id: i64);
    fn categories_mut(&mut self) -> &mut BTreeSet<Category>;
    fn linked_ids(&self) -> BTreeSet<i64>;
}

impl CategoryOwner for Product {
    const KIND: &'static str = "product";

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    fn categories_mut(&mut self) -> &mut BTreeSet<Category> {
        &mut self.categories
    }

    fn linked_ids(&self) -> BTreeSet<i64> {
        self.category_ids()
    }
}

impl CategoryOwner for User {
    const KIND: &'static str = "user";

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    fn categories_mut(&mut self) -> &mut BTreeSet<Category> {
        &mut self.categories
    }

    fn linked_ids(&self) -> BTreeSet<i64> {
        self.category_ids()
    }
}

#[derive(Debug, Default)]
struct Tables {
    categories: BTreeMap<i64, String>,
    products: BTreeMap<i64, Product>,
    users: BTreeMap<i64, User>,
    last_category_id: i64,
    last_product_id: i64,
    last_user_id: i64,
}

impl Tables {
    fn category(&self, id: i64) -> Option<Category> {
        self.categories
            .get(&id)
            .map(|name| Category::new(id, name.clone()))
    }

    fn materialize<T: CategoryOwner>(&self, mut record: T) -> T {
        let linked = record
            .linked_ids()
            .into_iter()
            .filter_map(|id| self.category(id))
            .collect();
        *record.categories_mut() = linked;
        record
    }

    fn is_referenced(&self, category_id: i64) -> bool {
        self.products
            .values()
            .any(|p| p.linked_ids().contains(&category_id))
            || self
                .users
                .values()
                .any(|u| u.linked_ids().contains(&category_id))
    }

    fn check_links<T: CategoryOwner>(&self, record: &T) -> DatabaseResult<()> {
        match record
            .linked_ids()
            .into_iter()
            .find(|id| !self.categories.contains_key(id))
        {
            Some(missing) => Err(DatabaseError::IntegrityViolation(format!(
                "{} references missing category {missing}",
                T::KIND
            ))),
            None => Ok(()),
        }
    }
}

/// Resolves the id a record is stored under, allocating one on insert.
fn assign_id<T: CategoryOwner>(
    rows: &BTreeMap<i64, T>,
    last_id: &mut i64,
    record: &T,
) -> DatabaseResult<i64> {
    match record.id() {
        Some(id) if rows.contains_key(&id) => Ok(id),
        Some(id) => Err(DatabaseError::Generic(format!(
            "no {} with id {id} to update",
            T::KIND
        ))),
        None => {
            *last_id += 1;
            Ok(*last_id)
        }
    }
}

fn sorted_page<T>(
    mut items: Vec<T>,
    request: &PageRequest,
    compare: impl Fn(&T, &T) -> Ordering,
) -> Page<T> {
    items.sort_by(compare);
    Page::slice(items, request)
}

/// Shared in-memory store handing out one repository per entity kind
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn categories(&self) -> InMemoryCategoryRepository {
        InMemoryCategoryRepository {
            tables: Arc::clone(&self.tables),
        }
    }

    pub fn products(&self) -> InMemoryProductRepository {
        InMemoryProductRepository {
            tables: Arc::clone(&self.tables),
        }
    }

    pub fn users(&self) -> InMemoryUserRepository {
        InMemoryUserRepository {
            tables: Arc::clone(&self.tables),
        }
    }
}

#[derive(Debug, Clone)]
pub struct InMemoryCategoryRepository {
    tables: Arc<RwLock<Tables>>,
}

#[async_trait]
impl CategoryRepository for InMemoryCategoryRepository {
    async fn find_by_id(&self, _tx: &Transaction, id: i64) -> DatabaseResult<Option<Category>> {
        Ok(self.tables.read().await.category(id))
    }

    async fn find_page(
        &self,
        _tx: &Transaction,
        request: &PageRequest,
    ) -> DatabaseResult<Page<Category>> {
        let tables = self.tables.read().await;
        let items = tables
            .categories
            .iter()
            .map(|(id, name)| Category::new(*id, name.clone()))
            .collect();

        let (key, direction) = resolve::<CategorySort>(request.sort.as_ref(), "category");
        Ok(sorted_page(items, request, |a, b| {
            let ordering = match key {
                CategorySort::Id => a.id.cmp(&b.id),
                CategorySort::Name => a.name.cmp(&b.name),
            };
            directed(ordering, direction).then_with(|| a.id.cmp(&b.id))
        }))
    }

    async fn save(&self, tx: &Transaction, mut category: Category) -> DatabaseResult<Category> {
        tx.ensure_writable()?;
        let mut tables = self.tables.write().await;

        let id = match category.id {
            Some(id) if tables.categories.contains_key(&id) => id,
            Some(id) => {
                return Err(DatabaseError::Generic(format!(
                    "no category with id {id} to update"
                )));
            }
            None => {
                tables.last_category_id += 1;
                tables.last_category_id
            }
        };

        category.id = Some(id);
        tables.categories.insert(id, category.name.clone());
        info!(category_id = id, "Saved category");
        Ok(category)
    }

    async fn delete_by_id(&self, tx: &Transaction, id: i64) -> DatabaseResult<()> {
        tx.ensure_writable()?;
        let mut tables = self.tables.write().await;

        if !tables.categories.contains_key(&id) {
            return Err(DatabaseError::NothingDeleted { id });
        }
        if tables.is_referenced(id) {
            return Err(DatabaseError::IntegrityViolation(format!(
                "category {id} is still referenced"
            )));
        }

        tables.categories.remove(&id);
        info!(category_id = id, "Deleted category");
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct InMemoryProductRepository {
    tables: Arc<RwLock<Tables>>,
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn find_by_id(&self, _tx: &Transaction, id: i64) -> DatabaseResult<Option<Product>> {
        let tables = self.tables.read().await;
        Ok(tables
            .products
            .get(&id)
            .cloned()
            .map(|product| tables.materialize(product)))
    }

    async fn find_page(
        &self,
        _tx: &Transaction,
        filter: &ProductFilter,
        request: &PageRequest,
    ) -> DatabaseResult<Page<Product>> {
        let tables = self.tables.read().await;
        let items = tables
            .products
            .values()
            .cloned()
            .map(|product| tables.materialize(product))
            .filter(|product| filter.matches(product))
            .collect();

        let (key, direction) = resolve::<ProductSort>(request.sort.as_ref(), "product");
        Ok(sorted_page(items, request, |a, b| {
            let ordering = match key {
                ProductSort::Id => a.id.cmp(&b.id),
                ProductSort::Name => a.name.cmp(&b.name),
                ProductSort::Price => a.price.total_cmp(&b.price),
                ProductSort::Date => a.date.cmp(&b.date),
            };
            directed(ordering, direction).then_with(|| a.id.cmp(&b.id))
        }))
    }

    async fn save(&self, tx: &Transaction, mut product: Product) -> DatabaseResult<Product> {
        tx.ensure_writable()?;
        let mut tables = self.tables.write().await;
        tables.check_links(&product)?;

        let tables = &mut *tables;
        let id = assign_id(&tables.products, &mut tables.last_product_id, &product)?;
        product.set_id(id);
        let product = tables.materialize(product);

        tables.products.insert(id, product.clone());
        info!(product_id = id, "Saved product");
        Ok(product)
    }

    async fn delete_by_id(&self, tx: &Transaction, id: i64) -> DatabaseResult<()> {
        tx.ensure_writable()?;
        self.tables
            .write()
            .await
            .products
            .remove(&id)
            .ok_or(DatabaseError::NothingDeleted { id })?;

        info!(product_id = id, "Deleted product");
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct InMemoryUserRepository {
    tables: Arc<RwLock<Tables>>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, _tx: &Transaction, id: i64) -> DatabaseResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .get(&id)
            .cloned()
            .map(|user| tables.materialize(user)))
    }

    async fn find_page(
        &self,
        _tx: &Transaction,
        request: &PageRequest,
    ) -> DatabaseResult<Page<User>> {
        let tables = self.tables.read().await;
        let items = tables
            .users
            .values()
            .cloned()
            .map(|user| tables.materialize(user))
            .collect();

        let (key, direction) = resolve::<UserSort>(request.sort.as_ref(), "user");
        Ok(sorted_page(items, request, |a, b| {
            let ordering = match key {
                UserSort::Id => a.id.cmp(&b.id),
                UserSort::Name => a.name.cmp(&b.name),
                UserSort::RegisteredAt => a.registered_at.cmp(&b.registered_at),
                UserSort::Balance => a.balance.total_cmp(&b.balance),
            };
            directed(ordering, direction).then_with(|| a.id.cmp(&b.id))
        }))
    }

    async fn save(&self, tx: &Transaction, mut user: User) -> DatabaseResult<User> {
        tx.ensure_writable()?;
        let mut tables = self.tables.write().await;
        tables.check_links(&user)?;

        let tables = &mut *tables;
        let id = assign_id(&tables.users, &mut tables.last_user_id, &user)?;
        user.set_id(id);
        let user = tables.materialize(user);

        tables.users.insert(id, user.clone());
        info!(user_id = id, "Saved user");
        Ok(user)
    }

    async fn delete_by_id(&self, tx: &Transaction, id: i64) -> DatabaseResult<()> {
        tx.ensure_writable()?;
        self.tables
            .write()
            .await
            .users
            .remove(&id)
            .ok_or(DatabaseError::NothingDeleted { id })?;

        info!(user_id = id, "Deleted user");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use database::{AccessMode, Sort};

    fn write() -> Transaction {
        Transaction::detached(AccessMode::ReadWrite)
    }

    fn read() -> Transaction {
        Transaction::detached(AccessMode::ReadOnly)
    }

    async fn category(catalog: &InMemoryCatalog, name: &str) -> Category {
        catalog
            .categories()
            .save(
                &write(),
                Category {
                    id: None,
                    name: name.into(),
                },
            )
            .await
            .unwrap()
    }

    fn product(name: &str, price: f64, categories: &[Category]) -> Product {
        Product {
            name: name.into(),
            price,
            categories: categories.iter().cloned().collect(),
            ..Product::default()
        }
    }

    #[tokio::test]
    async fn test_ids_are_assigned_in_sequence() {
        let catalog = InMemoryCatalog::new();
        let books = category(&catalog, "Books").await;
        let games = category(&catalog, "Games").await;

        assert_eq!(books.id, Some(1));
        assert_eq!(games.id, Some(2));
    }

    #[tokio::test]
    async fn test_writes_need_writable_scope() {
        let catalog = InMemoryCatalog::new();
        let result = catalog
            .products()
            .save(&read(), product("Phone", 10.0, &[]))
            .await;

        assert!(matches!(result, Err(DatabaseError::ReadOnlyTransaction)));
    }

    #[tokio::test]
    async fn test_renamed_category_shows_under_product() {
        let catalog = InMemoryCatalog::new();
        let mut books = category(&catalog, "Books").await;
        let saved = catalog
            .products()
            .save(&write(), product("Novel", 12.0, &[books.clone()]))
            .await
            .unwrap();

        books.name = "Literature".into();
        catalog.categories().save(&write(), books).await.unwrap();

        let found = catalog
            .products()
            .find_by_id(&read(), saved.id.unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            found.categories.into_iter().next().map(|c| c.name),
            Some("Literature".to_string())
        );
    }

    #[tokio::test]
    async fn test_referenced_category_cannot_be_deleted() {
        let catalog = InMemoryCatalog::new();
        let books = category(&catalog, "Books").await;
        catalog
            .products()
            .save(&write(), product("Novel", 12.0, &[books.clone()]))
            .await
            .unwrap();

        let result = catalog.categories().delete_by_id(&write(), 1).await;
        assert!(matches!(result, Err(DatabaseError::IntegrityViolation(_))));
        assert!(
            catalog
                .categories()
                .find_by_id(&read(), 1)
                .await
                .unwrap()
                .is_some()
        );
    }

    #[tokio::test]
    async fn test_link_to_missing_category_is_rejected() {
        let catalog = InMemoryCatalog::new();
        let ghost = Category::new(42, "Ghost");
        let result = catalog
            .products()
            .save(&write(), product("Phone", 10.0, &[ghost]))
            .await;

        assert!(matches!(result, Err(DatabaseError::IntegrityViolation(_))));
    }

    #[tokio::test]
    async fn test_delete_missing_reports_nothing_deleted() {
        let catalog = InMemoryCatalog::new();
        let result = catalog.users().delete_by_id(&write(), 7).await;
        assert!(matches!(
            result,
            Err(DatabaseError::NothingDeleted { id: 7 })
        ));
    }

    #[tokio::test]
    async fn test_update_of_unknown_id_fails() {
        let catalog = InMemoryCatalog::new();
        let mut ghost = product("Phone", 10.0, &[]);
        ghost.id = Some(99);

        let result = catalog.products().save(&write(), ghost).await;
        assert!(matches!(result, Err(DatabaseError::Generic(_))));
    }

    #[tokio::test]
    async fn test_find_page_filters_and_sorts() {
        let catalog = InMemoryCatalog::new();
        let books = category(&catalog, "Books").await;
        let repo = catalog.products();
        for (name, price) in [("Cheap book", 5.0), ("Pricey book", 50.0), ("Mid book", 20.0)] {
            repo.save(&write(), product(name, price, &[books.clone()]))
                .await
                .unwrap();
        }
        repo.save(&write(), product("Phone", 800.0, &[]))
            .await
            .unwrap();

        let filter = ProductFilter {
            name: None,
            category_id: Some(1),
        };
        let request = PageRequest::new(0, 2).with_sort(Sort::desc("price"));
        let page = repo.find_page(&read(), &filter, &request).await.unwrap();

        let names: Vec<_> = page.content.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Pricey book", "Mid book"]);
        assert_eq!(page.total_elements, 3);
        assert_eq!(page.total_pages, 2);
    }
}
