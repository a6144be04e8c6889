//! In-memory repositories for development and tests.
//!
//! Mirrors the Postgres backend's behavior — same scoping, same uniqueness
//! conflicts, same cascades — so black-box tests exercise the real rules.

use std::collections::{HashMap, HashSet};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use storecms_auth::Admin;
use storecms_catalog::{Category, Product, Store, Variant};
use storecms_core::{AdminId, CategoryId, ProductId, StoreId, VariantId, VariantOptionId};

use crate::error::{RepoError, RepoResult};
use crate::repo::{AdminRepo, CategoryRepo, ProductFilter, ProductRepo, StoreRepo, VariantRepo};

/// All catalog state behind `RwLock`-guarded maps.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    admins: RwLock<HashMap<AdminId, Admin>>,
    stores: RwLock<HashMap<StoreId, Store>>,
    categories: RwLock<HashMap<CategoryId, Category>>,
    variants: RwLock<HashMap<VariantId, Variant>>,
    products: RwLock<HashMap<ProductId, Product>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }
}

fn read<T>(lock: &RwLock<T>) -> RepoResult<RwLockReadGuard<'_, T>> {
    lock.read()
        .map_err(|_| RepoError::Storage("lock poisoned".to_string()))
}

fn write<T>(lock: &RwLock<T>) -> RepoResult<RwLockWriteGuard<'_, T>> {
    lock.write()
        .map_err(|_| RepoError::Storage("lock poisoned".to_string()))
}

#[async_trait]
impl AdminRepo for InMemoryCatalog {
    async fn create_admin(&self, admin: &Admin) -> RepoResult<()> {
        let mut admins = write(&self.admins)?;
        if admins
            .values()
            .any(|a| a.email == admin.email || a.username == admin.username)
        {
            return Err(RepoError::Conflict(
                "email or username already registered".to_string(),
            ));
        }
        admins.insert(admin.id, admin.clone());
        Ok(())
    }

    async fn admin_by_email(&self, email: &str) -> RepoResult<Option<Admin>> {
        let admins = read(&self.admins)?;
        Ok(admins.values().find(|a| a.email == email).cloned())
    }

    async fn admin_by_id(&self, id: AdminId) -> RepoResult<Option<Admin>> {
        let admins = read(&self.admins)?;
        Ok(admins.get(&id).cloned())
    }
}

#[async_trait]
impl StoreRepo for InMemoryCatalog {
    async fn create_store(&self, store: &Store) -> RepoResult<()> {
        if !read(&self.admins)?.contains_key(&store.admin_id) {
            return Err(RepoError::InvalidReference("admin does not exist".to_string()));
        }
        write(&self.stores)?.insert(store.id, store.clone());
        Ok(())
    }

    async fn stores_for_admin(&self, admin_id: AdminId) -> RepoResult<Vec<Store>> {
        let stores = read(&self.stores)?;
        let mut out: Vec<Store> = stores
            .values()
            .filter(|s| s.admin_id == admin_id)
            .cloned()
            .collect();
        out.sort_by_key(|s| s.created_at);
        Ok(out)
    }

    async fn store(&self, admin_id: AdminId, store_id: StoreId) -> RepoResult<Option<Store>> {
        let stores = read(&self.stores)?;
        Ok(stores
            .get(&store_id)
            .filter(|s| s.admin_id == admin_id)
            .cloned())
    }

    async fn update_store(&self, store: &Store) -> RepoResult<()> {
        let mut stores = write(&self.stores)?;
        match stores.get_mut(&store.id) {
            Some(existing) if existing.admin_id == store.admin_id => {
                *existing = store.clone();
                Ok(())
            }
            _ => Err(RepoError::NotFound),
        }
    }

    async fn delete_store(&self, admin_id: AdminId, store_id: StoreId) -> RepoResult<()> {
        let mut stores = write(&self.stores)?;
        match stores.get(&store_id) {
            Some(s) if s.admin_id == admin_id => {}
            _ => return Err(RepoError::NotFound),
        }
        stores.remove(&store_id);

        let mut categories = write(&self.categories)?;
        let removed_categories: HashSet<CategoryId> = categories
            .values()
            .filter(|c| c.store_id == store_id)
            .map(|c| c.id)
            .collect();
        categories.retain(|_, c| c.store_id != store_id);

        write(&self.variants)?.retain(|_, v| !removed_categories.contains(&v.category_id));
        write(&self.products)?.retain(|_, p| p.store_id != store_id);
        Ok(())
    }
}

#[async_trait]
impl CategoryRepo for InMemoryCatalog {
    async fn create_category(&self, category: &Category) -> RepoResult<()> {
        if !read(&self.stores)?.contains_key(&category.store_id) {
            return Err(RepoError::InvalidReference("store does not exist".to_string()));
        }
        write(&self.categories)?.insert(category.id, category.clone());
        Ok(())
    }

    async fn categories_for_store(&self, store_id: StoreId) -> RepoResult<Vec<Category>> {
        let categories = read(&self.categories)?;
        let mut out: Vec<Category> = categories
            .values()
            .filter(|c| c.store_id == store_id)
            .cloned()
            .collect();
        out.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(out)
    }

    async fn category(
        &self,
        store_id: StoreId,
        category_id: CategoryId,
    ) -> RepoResult<Option<Category>> {
        let categories = read(&self.categories)?;
        Ok(categories
            .get(&category_id)
            .filter(|c| c.store_id == store_id)
            .cloned())
    }

    async fn update_category(&self, category: &Category) -> RepoResult<()> {
        let mut categories = write(&self.categories)?;
        match categories.get_mut(&category.id) {
            Some(existing) if existing.store_id == category.store_id => {
                *existing = category.clone();
                Ok(())
            }
            _ => Err(RepoError::NotFound),
        }
    }

    async fn delete_category(&self, store_id: StoreId, category_id: CategoryId) -> RepoResult<()> {
        let mut categories = write(&self.categories)?;
        match categories.get(&category_id) {
            Some(c) if c.store_id == store_id => {}
            _ => return Err(RepoError::NotFound),
        }
        categories.remove(&category_id);

        let mut variants = write(&self.variants)?;
        let removed_options: HashSet<VariantOptionId> = variants
            .values()
            .filter(|v| v.category_id == category_id)
            .flat_map(|v| v.option_ids())
            .collect();
        variants.retain(|_, v| v.category_id != category_id);

        let mut products = write(&self.products)?;
        products.retain(|_, p| p.category_id != category_id);
        scrub_option_refs(&mut products, &removed_options);
        Ok(())
    }
}

#[async_trait]
impl VariantRepo for InMemoryCatalog {
    async fn create_variant(&self, variant: &Variant) -> RepoResult<()> {
        if !read(&self.categories)?.contains_key(&variant.category_id) {
            return Err(RepoError::InvalidReference("category does not exist".to_string()));
        }
        write(&self.variants)?.insert(variant.id, variant.clone());
        Ok(())
    }

    async fn variants_for_store(
        &self,
        store_id: StoreId,
        category_id: Option<CategoryId>,
    ) -> RepoResult<Vec<Variant>> {
        let categories = read(&self.categories)?;
        let store_categories: HashSet<CategoryId> = categories
            .values()
            .filter(|c| c.store_id == store_id)
            .map(|c| c.id)
            .collect();
        drop(categories);

        let variants = read(&self.variants)?;
        let mut out: Vec<Variant> = variants
            .values()
            .filter(|v| store_categories.contains(&v.category_id))
            .filter(|v| category_id.is_none_or(|c| v.category_id == c))
            .cloned()
            .collect();
        for v in &mut out {
            v.options.sort_by_key(|o| o.weight);
        }
        out.sort_by(|a, b| a.weight.cmp(&b.weight).then_with(|| a.name.cmp(&b.name)));
        Ok(out)
    }

    async fn variant(
        &self,
        store_id: StoreId,
        variant_id: VariantId,
    ) -> RepoResult<Option<Variant>> {
        let variants = read(&self.variants)?;
        let Some(variant) = variants.get(&variant_id).cloned() else {
            return Ok(None);
        };
        drop(variants);

        let categories = read(&self.categories)?;
        let in_store = categories
            .get(&variant.category_id)
            .is_some_and(|c| c.store_id == store_id);
        if !in_store {
            return Ok(None);
        }

        let mut variant = variant;
        variant.options.sort_by_key(|o| o.weight);
        Ok(Some(variant))
    }

    async fn update_variant(&self, variant: &Variant) -> RepoResult<()> {
        let mut variants = write(&self.variants)?;
        let Some(existing) = variants.get_mut(&variant.id) else {
            return Err(RepoError::NotFound);
        };

        let removed_options: HashSet<VariantOptionId> = existing
            .option_ids()
            .filter(|id| !variant.options.iter().any(|o| o.id == *id))
            .collect();
        *existing = variant.clone();
        drop(variants);

        let mut products = write(&self.products)?;
        scrub_option_refs(&mut products, &removed_options);
        Ok(())
    }

    async fn delete_variant(&self, store_id: StoreId, variant_id: VariantId) -> RepoResult<()> {
        let Some(existing) = self.variant(store_id, variant_id).await? else {
            return Err(RepoError::NotFound);
        };

        let removed_options: HashSet<VariantOptionId> = existing.option_ids().collect();
        write(&self.variants)?.remove(&variant_id);
        let mut products = write(&self.products)?;
        scrub_option_refs(&mut products, &removed_options);
        Ok(())
    }
}

#[async_trait]
impl ProductRepo for InMemoryCatalog {
    async fn create_product(&self, product: &Product) -> RepoResult<()> {
        if !read(&self.stores)?.contains_key(&product.store_id) {
            return Err(RepoError::InvalidReference("store does not exist".to_string()));
        }
        if !read(&self.categories)?.contains_key(&product.category_id) {
            return Err(RepoError::InvalidReference("category does not exist".to_string()));
        }
        write(&self.products)?.insert(product.id, product.clone());
        Ok(())
    }

    async fn products_for_store(
        &self,
        store_id: StoreId,
        filter: ProductFilter,
    ) -> RepoResult<Vec<Product>> {
        let products = read(&self.products)?;
        let mut out: Vec<Product> = products
            .values()
            .filter(|p| p.store_id == store_id)
            .filter(|p| filter.category_id.is_none_or(|c| p.category_id == c))
            .filter(|p| filter.featured.is_none_or(|f| p.is_featured == f))
            .filter(|p| filter.archived.is_none_or(|a| p.is_archived == a))
            .cloned()
            .collect();
        out.sort_by_key(|p| p.created_at);
        Ok(out)
    }

    async fn product(
        &self,
        store_id: StoreId,
        product_id: ProductId,
    ) -> RepoResult<Option<Product>> {
        let products = read(&self.products)?;
        Ok(products
            .get(&product_id)
            .filter(|p| p.store_id == store_id)
            .cloned())
    }

    async fn update_product(&self, product: &Product) -> RepoResult<()> {
        let mut products = write(&self.products)?;
        match products.get_mut(&product.id) {
            Some(existing) if existing.store_id == product.store_id => {
                *existing = product.clone();
                Ok(())
            }
            _ => Err(RepoError::NotFound),
        }
    }

    async fn delete_product(&self, store_id: StoreId, product_id: ProductId) -> RepoResult<()> {
        let mut products = write(&self.products)?;
        match products.get(&product_id) {
            Some(p) if p.store_id == store_id => {
                products.remove(&product_id);
                Ok(())
            }
            _ => Err(RepoError::NotFound),
        }
    }
}

/// Drop references to deleted variant options from product items, the way
/// the FK cascade removes junction rows in Postgres.
fn scrub_option_refs(
    products: &mut HashMap<ProductId, Product>,
    removed: &HashSet<VariantOptionId>,
) {
    if removed.is_empty() {
        return;
    }
    for product in products.values_mut() {
        for item in &mut product.items {
            item.variant_option_ids.retain(|id| !removed.contains(id));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use storecms_auth::Admin;
    use storecms_catalog::ProductItem;

    async fn seeded() -> (InMemoryCatalog, Admin, Store) {
        let catalog = InMemoryCatalog::new();
        let admin = Admin::new("alice", "alice@example.com", "$argon2$x", Utc::now()).unwrap();
        catalog.create_admin(&admin).await.unwrap();

        let store = Store::new(admin.id, "Outdoor", "", Utc::now()).unwrap();
        catalog.create_store(&store).await.unwrap();
        (catalog, admin, store)
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let (catalog, _, _) = seeded().await;
        let dup = Admin::new("bob", "alice@example.com", "$argon2$y", Utc::now()).unwrap();
        let result = catalog.create_admin(&dup).await;
        assert!(matches!(result, Err(RepoError::Conflict(_))));
    }

    #[tokio::test]
    async fn store_is_scoped_to_its_admin() {
        let (catalog, _, store) = seeded().await;

        let other = Admin::new("bob", "bob@example.com", "$argon2$y", Utc::now()).unwrap();
        catalog.create_admin(&other).await.unwrap();

        assert!(catalog.store(store.admin_id, store.id).await.unwrap().is_some());
        assert!(catalog.store(other.id, store.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_store_cascades() {
        let (catalog, admin, store) = seeded().await;

        let category = Category::new(store.id, "Tents").unwrap();
        catalog.create_category(&category).await.unwrap();

        let variant = Variant::new(
            category.id,
            "Size",
            "",
            0,
            vec![("S".into(), String::new(), 0)],
        )
        .unwrap();
        catalog.create_variant(&variant).await.unwrap();

        let product = Product::new(
            store.id,
            category.id,
            "Trail Tent",
            "Two-person tent",
            None,
            false,
            false,
            Utc::now(),
        )
        .unwrap();
        catalog.create_product(&product).await.unwrap();

        catalog.delete_store(admin.id, store.id).await.unwrap();

        assert!(catalog
            .categories_for_store(store.id)
            .await
            .unwrap()
            .is_empty());
        assert!(catalog
            .variants_for_store(store.id, None)
            .await
            .unwrap()
            .is_empty());
        assert!(catalog
            .products_for_store(store.id, ProductFilter::default())
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn delete_variant_scrubs_item_option_refs() {
        let (catalog, _, store) = seeded().await;

        let category = Category::new(store.id, "Shirts").unwrap();
        catalog.create_category(&category).await.unwrap();

        let variant = Variant::new(
            category.id,
            "Size",
            "",
            0,
            vec![("S".into(), String::new(), 0)],
        )
        .unwrap();
        catalog.create_variant(&variant).await.unwrap();

        let mut product = Product::new(
            store.id,
            category.id,
            "Tee",
            "Plain tee",
            None,
            false,
            false,
            Utc::now(),
        )
        .unwrap();
        let item = ProductItem::new(
            product.id,
            "TEE-S",
            5,
            1999,
            None,
            vec![variant.options[0].id],
        )
        .unwrap();
        product.set_items(vec![item]).unwrap();
        catalog.create_product(&product).await.unwrap();

        catalog.delete_variant(store.id, variant.id).await.unwrap();

        let reloaded = catalog.product(store.id, product.id).await.unwrap().unwrap();
        assert!(reloaded.items[0].variant_option_ids.is_empty());
    }

    #[tokio::test]
    async fn product_filters_narrow_listing() {
        let (catalog, _, store) = seeded().await;
        let category = Category::new(store.id, "Tents").unwrap();
        catalog.create_category(&category).await.unwrap();

        let featured = Product::new(
            store.id,
            category.id,
            "Featured Tent",
            "desc",
            None,
            true,
            false,
            Utc::now(),
        )
        .unwrap();
        let plain = Product::new(
            store.id,
            category.id,
            "Plain Tent",
            "desc",
            None,
            false,
            false,
            Utc::now(),
        )
        .unwrap();
        catalog.create_product(&featured).await.unwrap();
        catalog.create_product(&plain).await.unwrap();

        let filter = ProductFilter {
            featured: Some(true),
            ..Default::default()
        };
        let found = catalog.products_for_store(store.id, filter).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Featured Tent");
    }
}
