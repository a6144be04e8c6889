use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::json;

use storecms_catalog::Category;
use storecms_core::CategoryId;

use crate::app::routes::common::resolve_store;
use crate::app::{dto, errors, services::AppServices};
use crate::context::AdminContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_categories).post(create_category))
        .route(
            "/:category_id",
            get(get_category).put(update_category).delete(delete_category),
        )
}

pub async fn create_category(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(admin): Extension<AdminContext>,
    Path(store_id): Path<String>,
    Json(body): Json<dto::CategoryRequest>,
) -> axum::response::Response {
    let store = match resolve_store(&services, &admin, &store_id).await {
        Ok(s) => s,
        Err(resp) => return resp,
    };

    let category = match Category::new(store.id, body.name) {
        Ok(c) => c,
        Err(e) => return errors::domain_error_to_response(e),
    };

    if let Err(e) = services.categories().create_category(&category).await {
        return errors::repo_error_to_response(e);
    }

    (
        StatusCode::CREATED,
        Json(json!({
            "message": "category created",
            "data": dto::category_to_json(&category),
        })),
    )
        .into_response()
}

pub async fn list_categories(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(admin): Extension<AdminContext>,
    Path(store_id): Path<String>,
) -> axum::response::Response {
    let store = match resolve_store(&services, &admin, &store_id).await {
        Ok(s) => s,
        Err(resp) => return resp,
    };

    match services.categories().categories_for_store(store.id).await {
        Ok(categories) => Json(json!({
            "data": categories.iter().map(dto::category_to_json).collect::<Vec<_>>(),
        }))
        .into_response(),
        Err(e) => errors::repo_error_to_response(e),
    }
}

pub async fn get_category(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(admin): Extension<AdminContext>,
    Path((store_id, category_id)): Path<(String, String)>,
) -> axum::response::Response {
    let store = match resolve_store(&services, &admin, &store_id).await {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let category_id: CategoryId = match errors::parse_id(&category_id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.categories().category(store.id, category_id).await {
        Ok(Some(category)) => Json(json!({ "data": dto::category_to_json(&category) })).into_response(),
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "category not found"),
        Err(e) => errors::repo_error_to_response(e),
    }
}

pub async fn update_category(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(admin): Extension<AdminContext>,
    Path((store_id, category_id)): Path<(String, String)>,
    Json(body): Json<dto::CategoryRequest>,
) -> axum::response::Response {
    let store = match resolve_store(&services, &admin, &store_id).await {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let category_id: CategoryId = match errors::parse_id(&category_id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    let mut category = match services.categories().category(store.id, category_id).await {
        Ok(Some(c)) => c,
        Ok(None) => {
            return errors::json_error(StatusCode::NOT_FOUND, "not_found", "category not found")
        }
        Err(e) => return errors::repo_error_to_response(e),
    };

    if let Err(e) = category.rename(body.name) {
        return errors::domain_error_to_response(e);
    }

    if let Err(e) = services.categories().update_category(&category).await {
        return errors::repo_error_to_response(e);
    }

    Json(json!({
        "message": "category updated",
        "data": dto::category_to_json(&category),
    }))
    .into_response()
}

pub async fn delete_category(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(admin): Extension<AdminContext>,
    Path((store_id, category_id)): Path<(String, String)>,
) -> axum::response::Response {
    let store = match resolve_store(&services, &admin, &store_id).await {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let category_id: CategoryId = match errors::parse_id(&category_id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    if let Err(e) = services.categories().delete_category(store.id, category_id).await {
        return errors::repo_error_to_response(e);
    }

    Json(json!({ "message": "category deleted" })).into_response()
}
