use serde::Deserialize;

use storecms_auth::Admin;
use storecms_catalog::{Category, Product, ProductItem, Store, Variant, VariantOption};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct StoreRequest {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CategoryRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct VariantOptionRequest {
    pub value: String,
    pub description: Option<String>,
    pub weight: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct CreateVariantRequest {
    pub category_id: String,
    pub name: String,
    pub description: Option<String>,
    pub weight: Option<i32>,
    #[serde(default)]
    pub options: Vec<VariantOptionRequest>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateVariantRequest {
    pub name: String,
    pub description: Option<String>,
    pub weight: Option<i32>,
    #[serde(default)]
    pub options: Vec<VariantOptionRequest>,
}

#[derive(Debug, Deserialize)]
pub struct ProductItemRequest {
    pub sku: String,
    pub quantity: i64,
    /// Minor units (cents).
    pub price: i64,
    pub discounted_price: Option<i64>,
    #[serde(default)]
    pub variant_option_ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct ProductRequest {
    pub category_id: String,
    pub name: String,
    pub description: String,
    pub rating: Option<f32>,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub is_archived: bool,
    #[serde(default)]
    pub items: Vec<ProductItemRequest>,
}

#[derive(Debug, Deserialize)]
pub struct VariantListQuery {
    pub category_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ProductListQuery {
    pub category_id: Option<String>,
    pub featured: Option<bool>,
    pub archived: Option<bool>,
}

impl VariantOptionRequest {
    /// Into the `(value, description, weight)` tuple the domain constructor
    /// takes.
    pub fn into_parts(self) -> (String, String, i32) {
        (
            self.value,
            self.description.unwrap_or_default(),
            self.weight.unwrap_or(0),
        )
    }
}

// -------------------------
// JSON mapping helpers
// -------------------------

pub fn admin_to_json(admin: &Admin, stores: &[Store]) -> serde_json::Value {
    serde_json::json!({
        "id": admin.id.to_string(),
        "username": admin.username,
        "email": admin.email,
        "stores": stores.iter().map(store_to_json).collect::<Vec<_>>(),
    })
}

pub fn store_to_json(store: &Store) -> serde_json::Value {
    serde_json::json!({
        "id": store.id.to_string(),
        "admin_id": store.admin_id.to_string(),
        "name": store.name,
        "description": store.description,
        "created_at": store.created_at.to_rfc3339(),
    })
}

pub fn category_to_json(category: &Category) -> serde_json::Value {
    serde_json::json!({
        "id": category.id.to_string(),
        "store_id": category.store_id.to_string(),
        "name": category.name,
    })
}

pub fn variant_to_json(variant: &Variant) -> serde_json::Value {
    serde_json::json!({
        "id": variant.id.to_string(),
        "category_id": variant.category_id.to_string(),
        "name": variant.name,
        "description": variant.description,
        "weight": variant.weight,
        "options": variant.options.iter().map(variant_option_to_json).collect::<Vec<_>>(),
    })
}

pub fn variant_option_to_json(option: &VariantOption) -> serde_json::Value {
    serde_json::json!({
        "id": option.id.to_string(),
        "variant_id": option.variant_id.to_string(),
        "value": option.value,
        "description": option.description,
        "weight": option.weight,
    })
}

pub fn product_to_json(product: &Product) -> serde_json::Value {
    serde_json::json!({
        "id": product.id.to_string(),
        "store_id": product.store_id.to_string(),
        "category_id": product.category_id.to_string(),
        "name": product.name,
        "description": product.description,
        "rating": product.rating,
        "is_featured": product.is_featured,
        "is_archived": product.is_archived,
        "items": product.items.iter().map(item_to_json).collect::<Vec<_>>(),
        "created_at": product.created_at.to_rfc3339(),
    })
}

pub fn item_to_json(item: &ProductItem) -> serde_json::Value {
    serde_json::json!({
        "id": item.id.to_string(),
        "sku": item.sku,
        "quantity": item.quantity,
        "price": item.price,
        "discounted_price": item.discounted_price,
        "variant_option_ids": item
            .variant_option_ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>(),
    })
}
