use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::json;

use storecms_catalog::Variant;
use storecms_core::{CategoryId, VariantId};

use crate::app::routes::common::resolve_store;
use crate::app::{dto, errors, services::AppServices};
use crate::context::AdminContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_variants).post(create_variant))
        .route(
            "/:variant_id",
            get(get_variant).put(update_variant).delete(delete_variant),
        )
}

pub async fn create_variant(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(admin): Extension<AdminContext>,
    Path(store_id): Path<String>,
    Json(body): Json<dto::CreateVariantRequest>,
) -> axum::response::Response {
    let store = match resolve_store(&services, &admin, &store_id).await {
        Ok(s) => s,
        Err(resp) => return resp,
    };

    let category_id: CategoryId = match errors::parse_id(&body.category_id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    // The variant's category must live in this store.
    let category = match services.categories().category(store.id, category_id).await {
        Ok(Some(c)) => c,
        Ok(None) => {
            return errors::json_error(
                StatusCode::BAD_REQUEST,
                "invalid_reference",
                "category not found in store",
            )
        }
        Err(e) => return errors::repo_error_to_response(e),
    };

    let variant = match Variant::new(
        category.id,
        body.name,
        body.description.unwrap_or_default(),
        body.weight.unwrap_or(0),
        body.options.into_iter().map(|o| o.into_parts()).collect(),
    ) {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    if let Err(e) = services.variants().create_variant(&variant).await {
        return errors::repo_error_to_response(e);
    }

    (
        StatusCode::CREATED,
        Json(json!({
            "message": "variant created",
            "data": dto::variant_to_json(&variant),
        })),
    )
        .into_response()
}

pub async fn list_variants(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(admin): Extension<AdminContext>,
    Path(store_id): Path<String>,
    Query(query): Query<dto::VariantListQuery>,
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

    match services.variants().variants_for_store(store.id, category_id).await {
        Ok(variants) => Json(json!({
            "data": variants.iter().map(dto::variant_to_json).collect::<Vec<_>>(),
        }))
        .into_response(),
        Err(e) => errors::repo_error_to_response(e),
    }
}

pub async fn get_variant(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(admin): Extension<AdminContext>,
    Path((store_id, variant_id)): Path<(String, String)>,
) -> axum::response::Response {
    let store = match resolve_store(&services, &admin, &store_id).await {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let variant_id: VariantId = match errors::parse_id(&variant_id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.variants().variant(store.id, variant_id).await {
        Ok(Some(variant)) => Json(json!({ "data": dto::variant_to_json(&variant) })).into_response(),
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "variant not found"),
        Err(e) => errors::repo_error_to_response(e),
    }
}

pub async fn update_variant(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(admin): Extension<AdminContext>,
    Path((store_id, variant_id)): Path<(String, String)>,
    Json(body): Json<dto::UpdateVariantRequest>,
) -> axum::response::Response {
    let store = match resolve_store(&services, &admin, &store_id).await {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let variant_id: VariantId = match errors::parse_id(&variant_id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    let mut variant = match services.variants().variant(store.id, variant_id).await {
        Ok(Some(v)) => v,
        Ok(None) => {
            return errors::json_error(StatusCode::NOT_FOUND, "not_found", "variant not found")
        }
        Err(e) => return errors::repo_error_to_response(e),
    };

    if let Err(e) = variant.update(
        body.name,
        body.description.unwrap_or_default(),
        body.weight.unwrap_or(0),
        body.options.into_iter().map(|o| o.into_parts()).collect(),
    ) {
        return errors::domain_error_to_response(e);
    }

    if let Err(e) = services.variants().update_variant(&variant).await {
        return errors::repo_error_to_response(e);
    }

    Json(json!({
        "message": "variant updated",
        "data": dto::variant_to_json(&variant),
    }))
    .into_response()
}

pub async fn delete_variant(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(admin): Extension<AdminContext>,
    Path((store_id, variant_id)): Path<(String, String)>,
) -> axum::response::Response {
    let store = match resolve_store(&services, &admin, &store_id).await {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let variant_id: VariantId = match errors::parse_id(&variant_id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    if let Err(e) = services.variants().delete_variant(store.id, variant_id).await {
        return errors::repo_error_to_response(e);
    }

    Json(json!({ "message": "variant deleted" })).into_response()
}
