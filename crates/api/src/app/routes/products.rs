use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde_json::json;

use storecms_catalog::{validate_item_options, Category, Product, ProductItem};
use storecms_core::{CategoryId, ProductId, VariantOptionId};

use crate::app::routes::common::resolve_store;
use crate::app::{dto, errors, services::AppServices};
use crate::context::AdminContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/:product_id",
            get(get_product).put(update_product).delete(delete_product),
        )
}

pub async fn create_product(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(admin): Extension<AdminContext>,
    Path(store_id): Path<String>,
    Json(body): Json<dto::ProductRequest>,
) -> axum::response::Response {
    let store = match resolve_store(&services, &admin, &store_id).await {
        Ok(s) => s,
        Err(resp) => return resp,
    };

    let category = match category_in_store(&services, &store.id, &body.category_id).await {
        Ok(c) => c,
        Err(resp) => return resp,
    };

    let mut product = match Product::new(
        store.id,
        category.id,
        body.name,
        body.description,
        body.rating,
        body.is_featured,
        body.is_archived,
        Utc::now(),
    ) {
        Ok(p) => p,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let items = match build_items(&product, body.items) {
        Ok(items) => items,
        Err(resp) => return resp,
    };
    if let Err(e) = product.set_items(items) {
        return errors::domain_error_to_response(e);
    }

    if let Err(resp) = check_item_options(&services, &store.id, &category.id, &product).await {
        return resp;
    }

    if let Err(e) = services.products().create_product(&product).await {
        return errors::repo_error_to_response(e);
    }

    (
        StatusCode::CREATED,
        Json(json!({
            "message": "product created",
            "data": dto::product_to_json(&product),
        })),
    )
        .into_response()
}

pub async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(admin): Extension<AdminContext>,
    Path(store_id): Path<String>,
    Query(query): Query<dto::ProductListQuery>,
) -> axum::response::Response {
    let store = match resolve_store(&services, &admin, &store_id).await {
        Ok(s) => s,
        Err(resp) => return resp,
    };

    let category_id = match query.category_id.as_deref() {
        Some(raw) => match errors::parse_id::<CategoryId>(raw) {
            Ok(id) => Some(id),
            Err(resp) => return resp,
        },
        None => None,
    };

    let filter = storecms_infra::ProductFilter {
        category_id,
        featured: query.featured,
        archived: query.archived,
    };

    match services.products().products_for_store(store.id, filter).await {
        Ok(products) => Json(json!({
            "data": products.iter().map(dto::product_to_json).collect::<Vec<_>>(),
        }))
        .into_response(),
        Err(e) => errors::repo_error_to_response(e),
    }
}

pub async fn get_product(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(admin): Extension<AdminContext>,
    Path((store_id, product_id)): Path<(String, String)>,
) -> axum::response::Response {
    let store = match resolve_store(&services, &admin, &store_id).await {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let product_id: ProductId = match errors::parse_id(&product_id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.products().product(store.id, product_id).await {
        Ok(Some(product)) => Json(json!({ "data": dto::product_to_json(&product) })).into_response(),
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "product not found"),
        Err(e) => errors::repo_error_to_response(e),
    }
}

pub async fn update_product(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(admin): Extension<AdminContext>,
    Path((store_id, product_id)): Path<(String, String)>,
    Json(body): Json<dto::ProductRequest>,
) -> axum::response::Response {
    let store = match resolve_store(&services, &admin, &store_id).await {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let product_id: ProductId = match errors::parse_id(&product_id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    let mut product = match services.products().product(store.id, product_id).await {
        Ok(Some(p)) => p,
        Ok(None) => {
            return errors::json_error(StatusCode::NOT_FOUND, "not_found", "product not found")
        }
        Err(e) => return errors::repo_error_to_response(e),
    };

    let category = match category_in_store(&services, &store.id, &body.category_id).await {
        Ok(c) => c,
        Err(resp) => return resp,
    };

    if let Err(e) = product.update(
        category.id,
        body.name,
        body.description,
        body.rating,
        body.is_featured,
        body.is_archived,
    ) {
        return errors::domain_error_to_response(e);
    }

    let items = match build_items(&product, body.items) {
        Ok(items) => items,
        Err(resp) => return resp,
    };
    if let Err(e) = product.set_items(items) {
        return errors::domain_error_to_response(e);
    }

    if let Err(resp) = check_item_options(&services, &store.id, &category.id, &product).await {
        return resp;
    }

    if let Err(e) = services.products().update_product(&product).await {
        return errors::repo_error_to_response(e);
    }

    Json(json!({
        "message": "product updated",
        "data": dto::product_to_json(&product),
    }))
    .into_response()
}

pub async fn delete_product(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(admin): Extension<AdminContext>,
    Path((store_id, product_id)): Path<(String, String)>,
) -> axum::response::Response {
    let store = match resolve_store(&services, &admin, &store_id).await {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let product_id: ProductId = match errors::parse_id(&product_id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    if let Err(e) = services.products().delete_product(store.id, product_id).await {
        return errors::repo_error_to_response(e);
    }

    Json(json!({ "message": "product deleted" })).into_response()
}

async fn category_in_store(
    services: &Arc<AppServices>,
    store_id: &storecms_core::StoreId,
    raw_category_id: &str,
) -> Result<Category, axum::response::Response> {
    let category_id: CategoryId = errors::parse_id(raw_category_id)?;

    match services.categories().category(*store_id, category_id).await {
        Ok(Some(c)) => Ok(c),
        Ok(None) => Err(errors::json_error(
            StatusCode::BAD_REQUEST,
            "invalid_reference",
            "category not found in store",
        )),
        Err(e) => Err(errors::repo_error_to_response(e)),
    }
}

fn build_items(
    product: &Product,
    requests: Vec<dto::ProductItemRequest>,
) -> Result<Vec<ProductItem>, axum::response::Response> {
    let mut items = Vec::with_capacity(requests.len());
    for req in requests {
        let mut option_ids = Vec::with_capacity(req.variant_option_ids.len());
        for raw in &req.variant_option_ids {
            option_ids.push(errors::parse_id::<VariantOptionId>(raw)?);
        }

        let item = ProductItem::new(
            product.id,
            req.sku,
            req.quantity,
            req.price,
            req.discounted_price,
            option_ids,
        )
        .map_err(errors::domain_error_to_response)?;
        items.push(item);
    }
    Ok(items)
}

/// Every item option must reference a variant of the product's category.
async fn check_item_options(
    services: &Arc<AppServices>,
    store_id: &storecms_core::StoreId,
    category_id: &CategoryId,
    product: &Product,
) -> Result<(), axum::response::Response> {
    if product.items.iter().all(|i| i.variant_option_ids.is_empty()) {
        return Ok(());
    }

    let variants = services
        .variants()
        .variants_for_store(*store_id, Some(*category_id))
        .await
        .map_err(errors::repo_error_to_response)?;

    validate_item_options(&product.items, &variants).map_err(errors::domain_error_to_response)
}
