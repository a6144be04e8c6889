//! Postgres-backed repositories (sqlx).
//!
//! Scoping is enforced in every query's WHERE clause: stores by `admin_id`,
//! catalog rows by `store_id` (through a join where the table has no direct
//! store column). Multi-row writes run in a single transaction. Cascading
//! deletes are delegated to the schema's `ON DELETE CASCADE` rules.

use std::collections::HashMap;

use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool, Row};
use tracing::instrument;
use uuid::Uuid;

use storecms_auth::Admin;
use storecms_catalog::{Category, Product, ProductItem, Store, Variant, VariantOption};
use storecms_core::{AdminId, CategoryId, ProductId, StoreId, VariantId};

use crate::error::{is_unique_violation, map_sqlx_error, RepoError, RepoResult};
use crate::repo::{AdminRepo, CategoryRepo, ProductFilter, ProductRepo, StoreRepo, VariantRepo};

use async_trait::async_trait;

/// Repositories over a shared connection pool.
#[derive(Debug, Clone)]
pub struct PostgresCatalog {
    pool: PgPool,
}

impl PostgresCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Options for a set of variants, keyed by variant id, ordered by weight.
    async fn load_options(
        &self,
        variant_ids: &[Uuid],
    ) -> RepoResult<HashMap<Uuid, Vec<VariantOption>>> {
        if variant_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query(
            r#"
            SELECT id, variant_id, value, description, weight
            FROM variant_options
            WHERE variant_id = ANY($1)
            ORDER BY weight, value
            "#,
        )
        .bind(variant_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("load_options", e))?;

        let mut by_variant: HashMap<Uuid, Vec<VariantOption>> = HashMap::new();
        for row in rows {
            let parsed = VariantOptionRow::from_row(&row)
                .map_err(|e| RepoError::Storage(format!("decode variant option row: {}", e)))?;
            by_variant
                .entry(parsed.variant_id)
                .or_default()
                .push(parsed.into());
        }
        Ok(by_variant)
    }

    /// Items (with their option references) for a set of products, keyed by
    /// product id.
    async fn load_items(&self, product_ids: &[Uuid]) -> RepoResult<HashMap<Uuid, Vec<ProductItem>>> {
        if product_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let item_rows = sqlx::query(
            r#"
            SELECT id, product_id, sku, quantity, price, discounted_price
            FROM product_items
            WHERE product_id = ANY($1)
            ORDER BY sku
            "#,
        )
        .bind(product_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("load_items", e))?;

        let mut items: Vec<ProductItemRow> = Vec::with_capacity(item_rows.len());
        for row in item_rows {
            items.push(
                ProductItemRow::from_row(&row)
                    .map_err(|e| RepoError::Storage(format!("decode item row: {}", e)))?,
            );
        }

        let item_ids: Vec<Uuid> = items.iter().map(|i| i.id).collect();
        let mut options_by_item: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        if !item_ids.is_empty() {
            let option_rows = sqlx::query(
                r#"
                SELECT item_id, variant_option_id
                FROM product_item_options
                WHERE item_id = ANY($1)
                ORDER BY item_id, position
                "#,
            )
            .bind(&item_ids)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("load_item_options", e))?;

            for row in option_rows {
                let item_id: Uuid = row
                    .try_get("item_id")
                    .map_err(|e| RepoError::Storage(format!("decode item option row: {}", e)))?;
                let option_id: Uuid = row
                    .try_get("variant_option_id")
                    .map_err(|e| RepoError::Storage(format!("decode item option row: {}", e)))?;
                options_by_item.entry(item_id).or_default().push(option_id);
            }
        }

        let mut by_product: HashMap<Uuid, Vec<ProductItem>> = HashMap::new();
        for item in items {
            let option_ids = options_by_item.remove(&item.id).unwrap_or_default();
            by_product
                .entry(item.product_id)
                .or_default()
                .push(item.into_item(option_ids));
        }
        Ok(by_product)
    }

    /// Insert a product's items (and their option links) inside `tx`.
    async fn insert_items(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        product: &Product,
    ) -> RepoResult<()> {
        for item in &product.items {
            sqlx::query(
                r#"
                INSERT INTO product_items (id, product_id, sku, quantity, price, discounted_price)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(item.id.as_uuid())
            .bind(product.id.as_uuid())
            .bind(&item.sku)
            .bind(item.quantity)
            .bind(item.price)
            .bind(item.discounted_price)
            .execute(&mut **tx)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    RepoError::Conflict(format!("duplicate SKU within product: {}", item.sku))
                } else {
                    map_sqlx_error("insert_item", e)
                }
            })?;

            for (position, option_id) in item.variant_option_ids.iter().enumerate() {
                sqlx::query(
                    r#"
                    INSERT INTO product_item_options (item_id, variant_option_id, position)
                    VALUES ($1, $2, $3)
                    "#,
                )
                .bind(item.id.as_uuid())
                .bind(option_id.as_uuid())
                .bind(position as i32)
                .execute(&mut **tx)
                .await
                .map_err(|e| map_sqlx_error("insert_item_option", e))?;
            }
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Admins
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl AdminRepo for PostgresCatalog {
    async fn create_admin(&self, admin: &Admin) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO admins (id, username, email, password_hash, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(admin.id.as_uuid())
        .bind(&admin.username)
        .bind(&admin.email)
        .bind(&admin.password_hash)
        .bind(admin.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                RepoError::Conflict("email or username already registered".to_string())
            } else {
                map_sqlx_error("create_admin", e)
            }
        })?;
        Ok(())
    }

    async fn admin_by_email(&self, email: &str) -> RepoResult<Option<Admin>> {
        let row = sqlx::query(
            "SELECT id, username, email, password_hash, created_at FROM admins WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("admin_by_email", e))?;

        row.map(|r| AdminRow::from_row(&r).map(Into::into))
            .transpose()
            .map_err(|e| RepoError::Storage(format!("decode admin row: {}", e)))
    }

    async fn admin_by_id(&self, id: AdminId) -> RepoResult<Option<Admin>> {
        let row = sqlx::query(
            "SELECT id, username, email, password_hash, created_at FROM admins WHERE id = $1",
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("admin_by_id", e))?;

        row.map(|r| AdminRow::from_row(&r).map(Into::into))
            .transpose()
            .map_err(|e| RepoError::Storage(format!("decode admin row: {}", e)))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Stores
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl StoreRepo for PostgresCatalog {
    async fn create_store(&self, store: &Store) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO stores (id, admin_id, name, description, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(store.id.as_uuid())
        .bind(store.admin_id.as_uuid())
        .bind(&store.name)
        .bind(&store.description)
        .bind(store.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("create_store", e))?;
        Ok(())
    }

    async fn stores_for_admin(&self, admin_id: AdminId) -> RepoResult<Vec<Store>> {
        let rows = sqlx::query(
            r#"
            SELECT id, admin_id, name, description, created_at
            FROM stores
            WHERE admin_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(admin_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("stores_for_admin", e))?;

        rows.iter()
            .map(|r| StoreRow::from_row(r).map(Into::into))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| RepoError::Storage(format!("decode store row: {}", e)))
    }

    async fn store(&self, admin_id: AdminId, store_id: StoreId) -> RepoResult<Option<Store>> {
        let row = sqlx::query(
            r#"
            SELECT id, admin_id, name, description, created_at
            FROM stores
            WHERE id = $1 AND admin_id = $2
            "#,
        )
        .bind(store_id.as_uuid())
        .bind(admin_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("store", e))?;

        row.map(|r| StoreRow::from_row(&r).map(Into::into))
            .transpose()
            .map_err(|e| RepoError::Storage(format!("decode store row: {}", e)))
    }

    async fn update_store(&self, store: &Store) -> RepoResult<()> {
        let result = sqlx::query(
            "UPDATE stores SET name = $3, description = $4 WHERE id = $1 AND admin_id = $2",
        )
        .bind(store.id.as_uuid())
        .bind(store.admin_id.as_uuid())
        .bind(&store.name)
        .bind(&store.description)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("update_store", e))?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    #[instrument(skip(self), fields(admin_id = %admin_id, store_id = %store_id), err)]
    async fn delete_store(&self, admin_id: AdminId, store_id: StoreId) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM stores WHERE id = $1 AND admin_id = $2")
            .bind(store_id.as_uuid())
            .bind(admin_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_store", e))?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Categories
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl CategoryRepo for PostgresCatalog {
    async fn create_category(&self, category: &Category) -> RepoResult<()> {
        sqlx::query("INSERT INTO categories (id, store_id, name) VALUES ($1, $2, $3)")
            .bind(category.id.as_uuid())
            .bind(category.store_id.as_uuid())
            .bind(&category.name)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("create_category", e))?;
        Ok(())
    }

    async fn categories_for_store(&self, store_id: StoreId) -> RepoResult<Vec<Category>> {
        let rows = sqlx::query(
            "SELECT id, store_id, name FROM categories WHERE store_id = $1 ORDER BY name",
        )
        .bind(store_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("categories_for_store", e))?;

        rows.iter()
            .map(|r| CategoryRow::from_row(r).map(Into::into))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| RepoError::Storage(format!("decode category row: {}", e)))
    }

    async fn category(
        &self,
        store_id: StoreId,
        category_id: CategoryId,
    ) -> RepoResult<Option<Category>> {
        let row = sqlx::query("SELECT id, store_id, name FROM categories WHERE id = $1 AND store_id = $2")
            .bind(category_id.as_uuid())
            .bind(store_id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("category", e))?;

        row.map(|r| CategoryRow::from_row(&r).map(Into::into))
            .transpose()
            .map_err(|e| RepoError::Storage(format!("decode category row: {}", e)))
    }

    async fn update_category(&self, category: &Category) -> RepoResult<()> {
        let result = sqlx::query("UPDATE categories SET name = $3 WHERE id = $1 AND store_id = $2")
            .bind(category.id.as_uuid())
            .bind(category.store_id.as_uuid())
            .bind(&category.name)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("update_category", e))?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn delete_category(&self, store_id: StoreId, category_id: CategoryId) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1 AND store_id = $2")
            .bind(category_id.as_uuid())
            .bind(store_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_category", e))?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Variants
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl VariantRepo for PostgresCatalog {
    async fn create_variant(&self, variant: &Variant) -> RepoResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin_transaction", e))?;

        sqlx::query(
            r#"
            INSERT INTO variants (id, category_id, name, description, weight)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(variant.id.as_uuid())
        .bind(variant.category_id.as_uuid())
        .bind(&variant.name)
        .bind(&variant.description)
        .bind(variant.weight)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("create_variant", e))?;

        for option in &variant.options {
            sqlx::query(
                r#"
                INSERT INTO variant_options (id, variant_id, value, description, weight)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(option.id.as_uuid())
            .bind(variant.id.as_uuid())
            .bind(&option.value)
            .bind(&option.description)
            .bind(option.weight)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("create_variant_option", e))?;
        }

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("commit_transaction", e))?;
        Ok(())
    }

    async fn variants_for_store(
        &self,
        store_id: StoreId,
        category_id: Option<CategoryId>,
    ) -> RepoResult<Vec<Variant>> {
        let rows = sqlx::query(
            r#"
            SELECT v.id, v.category_id, v.name, v.description, v.weight
            FROM variants v
            JOIN categories c ON c.id = v.category_id
            WHERE c.store_id = $1 AND ($2::uuid IS NULL OR v.category_id = $2)
            ORDER BY v.weight, v.name
            "#,
        )
        .bind(store_id.as_uuid())
        .bind(category_id.map(|c| *c.as_uuid()))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("variants_for_store", e))?;

        let mut variants: Vec<VariantRow> = Vec::with_capacity(rows.len());
        for row in rows {
            variants.push(
                VariantRow::from_row(&row)
                    .map_err(|e| RepoError::Storage(format!("decode variant row: {}", e)))?,
            );
        }

        let ids: Vec<Uuid> = variants.iter().map(|v| v.id).collect();
        let mut options = self.load_options(&ids).await?;

        Ok(variants
            .into_iter()
            .map(|v| {
                let opts = options.remove(&v.id).unwrap_or_default();
                v.into_variant(opts)
            })
            .collect())
    }

    async fn variant(
        &self,
        store_id: StoreId,
        variant_id: VariantId,
    ) -> RepoResult<Option<Variant>> {
        let row = sqlx::query(
            r#"
            SELECT v.id, v.category_id, v.name, v.description, v.weight
            FROM variants v
            JOIN categories c ON c.id = v.category_id
            WHERE v.id = $1 AND c.store_id = $2
            "#,
        )
        .bind(variant_id.as_uuid())
        .bind(store_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("variant", e))?;

        let Some(row) = row else {
            return Ok(None);
        };
        let parsed = VariantRow::from_row(&row)
            .map_err(|e| RepoError::Storage(format!("decode variant row: {}", e)))?;

        let mut options = self.load_options(&[parsed.id]).await?;
        let opts = options.remove(&parsed.id).unwrap_or_default();
        Ok(Some(parsed.into_variant(opts)))
    }

    async fn update_variant(&self, variant: &Variant) -> RepoResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin_transaction", e))?;

        let result = sqlx::query(
            "UPDATE variants SET name = $2, description = $3, weight = $4 WHERE id = $1",
        )
        .bind(variant.id.as_uuid())
        .bind(&variant.name)
        .bind(&variant.description)
        .bind(variant.weight)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("update_variant", e))?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }

        // Replace the option set; stale item option links go with the
        // cascade on variant_options.
        sqlx::query("DELETE FROM variant_options WHERE variant_id = $1")
            .bind(variant.id.as_uuid())
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("delete_variant_options", e))?;

        for option in &variant.options {
            sqlx::query(
                r#"
                INSERT INTO variant_options (id, variant_id, value, description, weight)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(option.id.as_uuid())
            .bind(variant.id.as_uuid())
            .bind(&option.value)
            .bind(&option.description)
            .bind(option.weight)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("insert_variant_option", e))?;
        }

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("commit_transaction", e))?;
        Ok(())
    }

    async fn delete_variant(&self, store_id: StoreId, variant_id: VariantId) -> RepoResult<()> {
        let result = sqlx::query(
            r#"
            DELETE FROM variants v
            USING categories c
            WHERE v.id = $1 AND v.category_id = c.id AND c.store_id = $2
            "#,
        )
        .bind(variant_id.as_uuid())
        .bind(store_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("delete_variant", e))?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Products
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl ProductRepo for PostgresCatalog {
    #[instrument(skip(self, product), fields(product_id = %product.id, item_count = product.items.len()), err)]
    async fn create_product(&self, product: &Product) -> RepoResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin_transaction", e))?;

        sqlx::query(
            r#"
            INSERT INTO products
                (id, store_id, category_id, name, description, rating,
                 is_featured, is_archived, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(product.id.as_uuid())
        .bind(product.store_id.as_uuid())
        .bind(product.category_id.as_uuid())
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.rating)
        .bind(product.is_featured)
        .bind(product.is_archived)
        .bind(product.created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("create_product", e))?;

        Self::insert_items(&mut tx, product).await?;

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("commit_transaction", e))?;
        Ok(())
    }

    async fn products_for_store(
        &self,
        store_id: StoreId,
        filter: ProductFilter,
    ) -> RepoResult<Vec<Product>> {
        let rows = sqlx::query(
            r#"
            SELECT id, store_id, category_id, name, description, rating,
                   is_featured, is_archived, created_at
            FROM products
            WHERE store_id = $1
              AND ($2::uuid IS NULL OR category_id = $2)
              AND ($3::boolean IS NULL OR is_featured = $3)
              AND ($4::boolean IS NULL OR is_archived = $4)
            ORDER BY created_at
            "#,
        )
        .bind(store_id.as_uuid())
        .bind(filter.category_id.map(|c| *c.as_uuid()))
        .bind(filter.featured)
        .bind(filter.archived)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("products_for_store", e))?;

        let mut products: Vec<ProductRow> = Vec::with_capacity(rows.len());
        for row in rows {
            products.push(
                ProductRow::from_row(&row)
                    .map_err(|e| RepoError::Storage(format!("decode product row: {}", e)))?,
            );
        }

        let ids: Vec<Uuid> = products.iter().map(|p| p.id).collect();
        let mut items = self.load_items(&ids).await?;

        Ok(products
            .into_iter()
            .map(|p| {
                let product_items = items.remove(&p.id).unwrap_or_default();
                p.into_product(product_items)
            })
            .collect())
    }

    async fn product(
        &self,
        store_id: StoreId,
        product_id: ProductId,
    ) -> RepoResult<Option<Product>> {
        let row = sqlx::query(
            r#"
            SELECT id, store_id, category_id, name, description, rating,
                   is_featured, is_archived, created_at
            FROM products
            WHERE id = $1 AND store_id = $2
            "#,
        )
        .bind(product_id.as_uuid())
        .bind(store_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("product", e))?;

        let Some(row) = row else {
            return Ok(None);
        };
        let parsed = ProductRow::from_row(&row)
            .map_err(|e| RepoError::Storage(format!("decode product row: {}", e)))?;

        let mut items = self.load_items(&[parsed.id]).await?;
        let product_items = items.remove(&parsed.id).unwrap_or_default();
        Ok(Some(parsed.into_product(product_items)))
    }

    async fn update_product(&self, product: &Product) -> RepoResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin_transaction", e))?;

        let result = sqlx::query(
            r#"
            UPDATE products
            SET category_id = $3, name = $4, description = $5, rating = $6,
                is_featured = $7, is_archived = $8
            WHERE id = $1 AND store_id = $2
            "#,
        )
        .bind(product.id.as_uuid())
        .bind(product.store_id.as_uuid())
        .bind(product.category_id.as_uuid())
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.rating)
        .bind(product.is_featured)
        .bind(product.is_archived)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("update_product", e))?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }

        // Full item replacement; junction rows cascade with the items.
        sqlx::query("DELETE FROM product_items WHERE product_id = $1")
            .bind(product.id.as_uuid())
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("delete_items", e))?;

        Self::insert_items(&mut tx, product).await?;

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("commit_transaction", e))?;
        Ok(())
    }

    async fn delete_product(&self, store_id: StoreId, product_id: ProductId) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1 AND store_id = $2")
            .bind(product_id.as_uuid())
            .bind(store_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_product", e))?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// SQLx row types
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug)]
struct AdminRow {
    id: Uuid,
    username: String,
    email: String,
    password_hash: String,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl<'r> FromRow<'r, PgRow> for AdminRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(AdminRow {
            id: row.try_get("id")?,
            username: row.try_get("username")?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password_hash")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

impl From<AdminRow> for Admin {
    fn from(row: AdminRow) -> Self {
        Admin {
            id: AdminId::from_uuid(row.id),
            username: row.username,
            email: row.email,
            password_hash: row.password_hash,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug)]
struct StoreRow {
    id: Uuid,
    admin_id: Uuid,
    name: String,
    description: String,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl<'r> FromRow<'r, PgRow> for StoreRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(StoreRow {
            id: row.try_get("id")?,
            admin_id: row.try_get("admin_id")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

impl From<StoreRow> for Store {
    fn from(row: StoreRow) -> Self {
        Store {
            id: StoreId::from_uuid(row.id),
            admin_id: AdminId::from_uuid(row.admin_id),
            name: row.name,
            description: row.description,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug)]
struct CategoryRow {
    id: Uuid,
    store_id: Uuid,
    name: String,
}

impl<'r> FromRow<'r, PgRow> for CategoryRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(CategoryRow {
            id: row.try_get("id")?,
            store_id: row.try_get("store_id")?,
            name: row.try_get("name")?,
        })
    }
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Category {
            id: CategoryId::from_uuid(row.id),
            store_id: StoreId::from_uuid(row.store_id),
            name: row.name,
        }
    }
}

#[derive(Debug)]
struct VariantRow {
    id: Uuid,
    category_id: Uuid,
    name: String,
    description: String,
    weight: i32,
}

impl<'r> FromRow<'r, PgRow> for VariantRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(VariantRow {
            id: row.try_get("id")?,
            category_id: row.try_get("category_id")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            weight: row.try_get("weight")?,
        })
    }
}

impl VariantRow {
    fn into_variant(self, options: Vec<VariantOption>) -> Variant {
        Variant {
            id: VariantId::from_uuid(self.id),
            category_id: CategoryId::from_uuid(self.category_id),
            name: self.name,
            description: self.description,
            weight: self.weight,
            options,
        }
    }
}

#[derive(Debug)]
struct VariantOptionRow {
    id: Uuid,
    variant_id: Uuid,
    value: String,
    description: String,
    weight: i32,
}

impl<'r> FromRow<'r, PgRow> for VariantOptionRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(VariantOptionRow {
            id: row.try_get("id")?,
            variant_id: row.try_get("variant_id")?,
            value: row.try_get("value")?,
            description: row.try_get("description")?,
            weight: row.try_get("weight")?,
        })
    }
}

impl From<VariantOptionRow> for VariantOption {
    fn from(row: VariantOptionRow) -> Self {
        VariantOption {
            id: storecms_core::VariantOptionId::from_uuid(row.id),
            variant_id: VariantId::from_uuid(row.variant_id),
            value: row.value,
            description: row.description,
            weight: row.weight,
        }
    }
}

#[derive(Debug)]
struct ProductRow {
    id: Uuid,
    store_id: Uuid,
    category_id: Uuid,
    name: String,
    description: String,
    rating: Option<f32>,
    is_featured: bool,
    is_archived: bool,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl<'r> FromRow<'r, PgRow> for ProductRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(ProductRow {
            id: row.try_get("id")?,
            store_id: row.try_get("store_id")?,
            category_id: row.try_get("category_id")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            rating: row.try_get("rating")?,
            is_featured: row.try_get("is_featured")?,
            is_archived: row.try_get("is_archived")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

impl ProductRow {
    fn into_product(self, items: Vec<ProductItem>) -> Product {
        Product {
            id: ProductId::from_uuid(self.id),
            store_id: StoreId::from_uuid(self.store_id),
            category_id: CategoryId::from_uuid(self.category_id),
            name: self.name,
            description: self.description,
            rating: self.rating,
            is_featured: self.is_featured,
            is_archived: self.is_archived,
            items,
            created_at: self.created_at,
        }
    }
}

#[derive(Debug)]
struct ProductItemRow {
    id: Uuid,
    product_id: Uuid,
    sku: String,
    quantity: i64,
    price: i64,
    discounted_price: Option<i64>,
}

impl<'r> FromRow<'r, PgRow> for ProductItemRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(ProductItemRow {
            id: row.try_get("id")?,
            product_id: row.try_get("product_id")?,
            sku: row.try_get("sku")?,
            quantity: row.try_get("quantity")?,
            price: row.try_get("price")?,
            discounted_price: row.try_get("discounted_price")?,
        })
    }
}

impl ProductItemRow {
    fn into_item(self, option_ids: Vec<Uuid>) -> ProductItem {
        ProductItem {
            id: storecms_core::ProductItemId::from_uuid(self.id),
            product_id: ProductId::from_uuid(self.product_id),
            sku: self.sku,
            quantity: self.quantity,
            price: self.price,
            discounted_price: self.discounted_price,
            variant_option_ids: option_ids
                .into_iter()
                .map(storecms_core::VariantOptionId::from_uuid)
                .collect(),
        }
    }
}
