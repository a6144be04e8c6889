//! Repository traits.
//!
//! Every catalog query and mutation is scoped: stores by their owning admin,
//! everything else by its store. A row outside the caller's scope behaves as
//! if it did not exist (`None` / `RepoError::NotFound`) — cross-admin access
//! must be indistinguishable from a missing row.

use async_trait::async_trait;

use storecms_auth::Admin;
use storecms_catalog::{Category, Product, Store, Variant};
use storecms_core::{AdminId, CategoryId, ProductId, StoreId, VariantId};

use crate::error::RepoResult;

#[async_trait]
pub trait AdminRepo: Send + Sync {
    /// Persist a new admin. `Conflict` on duplicate email or username.
    async fn create_admin(&self, admin: &Admin) -> RepoResult<()>;

    async fn admin_by_email(&self, email: &str) -> RepoResult<Option<Admin>>;

    async fn admin_by_id(&self, id: AdminId) -> RepoResult<Option<Admin>>;
}

#[async_trait]
pub trait StoreRepo: Send + Sync {
    async fn create_store(&self, store: &Store) -> RepoResult<()>;

    async fn stores_for_admin(&self, admin_id: AdminId) -> RepoResult<Vec<Store>>;

    async fn store(&self, admin_id: AdminId, store_id: StoreId) -> RepoResult<Option<Store>>;

    /// Update a store in place, scoped by `store.admin_id`. `NotFound` if the
    /// store does not exist for that admin.
    async fn update_store(&self, store: &Store) -> RepoResult<()>;

    /// Delete a store and everything under it (categories, variants,
    /// products, items).
    async fn delete_store(&self, admin_id: AdminId, store_id: StoreId) -> RepoResult<()>;
}

#[async_trait]
pub trait CategoryRepo: Send + Sync {
    async fn create_category(&self, category: &Category) -> RepoResult<()>;

    async fn categories_for_store(&self, store_id: StoreId) -> RepoResult<Vec<Category>>;

    async fn category(
        &self,
        store_id: StoreId,
        category_id: CategoryId,
    ) -> RepoResult<Option<Category>>;

    async fn update_category(&self, category: &Category) -> RepoResult<()>;

    /// Delete a category and its variants/products.
    async fn delete_category(&self, store_id: StoreId, category_id: CategoryId) -> RepoResult<()>;
}

#[async_trait]
pub trait VariantRepo: Send + Sync {
    /// Persist a variant together with its options.
    async fn create_variant(&self, variant: &Variant) -> RepoResult<()>;

    /// Variants of a store, optionally narrowed to one category, ordered by
    /// weight.
    async fn variants_for_store(
        &self,
        store_id: StoreId,
        category_id: Option<CategoryId>,
    ) -> RepoResult<Vec<Variant>>;

    async fn variant(&self, store_id: StoreId, variant_id: VariantId)
        -> RepoResult<Option<Variant>>;

    /// Update a variant in place, replacing its option set.
    async fn update_variant(&self, variant: &Variant) -> RepoResult<()>;

    async fn delete_variant(&self, store_id: StoreId, variant_id: VariantId) -> RepoResult<()>;
}

/// Optional narrowing filters for product listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProductFilter {
    pub category_id: Option<CategoryId>,
    pub featured: Option<bool>,
    pub archived: Option<bool>,
}

#[async_trait]
pub trait ProductRepo: Send + Sync {
    /// Persist a product together with its items (one transaction).
    async fn create_product(&self, product: &Product) -> RepoResult<()>;

    async fn products_for_store(
        &self,
        store_id: StoreId,
        filter: ProductFilter,
    ) -> RepoResult<Vec<Product>>;

    async fn product(&self, store_id: StoreId, product_id: ProductId)
        -> RepoResult<Option<Product>>;

    /// Update a product in place, replacing its item set.
    async fn update_product(&self, product: &Product) -> RepoResult<()>;

    async fn delete_product(&self, store_id: StoreId, product_id: ProductId) -> RepoResult<()>;
}
