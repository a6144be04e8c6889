use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde_json::json;

use storecms_catalog::Store;

use crate::app::routes::common::resolve_store;
use crate::app::{dto, errors, services::AppServices};
use crate::context::AdminContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_stores).post(create_store))
        .route(
            "/:store_id",
            get(get_store).put(update_store).delete(delete_store),
        )
        .nest("/:store_id/categories", super::categories::router())
        .nest("/:store_id/variants", super::variants::router())
        .nest("/:store_id/products", super::products::router())
}

pub async fn create_store(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(admin): Extension<AdminContext>,
    Json(body): Json<dto::StoreRequest>,
) -> axum::response::Response {
    let store = match Store::new(
        admin.admin_id(),
        body.name,
        body.description.unwrap_or_default(),
        Utc::now(),
    ) {
        Ok(s) => s,
        Err(e) => return errors::domain_error_to_response(e),
    };

    if let Err(e) = services.stores().create_store(&store).await {
        return errors::repo_error_to_response(e);
    }

    (
        StatusCode::CREATED,
        Json(json!({
            "message": "store created",
            "data": dto::store_to_json(&store),
        })),
    )
        .into_response()
}

pub async fn list_stores(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(admin): Extension<AdminContext>,
) -> axum::response::Response {
    match services.stores().stores_for_admin(admin.admin_id()).await {
        Ok(stores) => Json(json!({
            "data": stores.iter().map(dto::store_to_json).collect::<Vec<_>>(),
        }))
        .into_response(),
        Err(e) => errors::repo_error_to_response(e),
    }
}

pub async fn get_store(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(admin): Extension<AdminContext>,
    Path(store_id): Path<String>,
) -> axum::response::Response {
    match resolve_store(&services, &admin, &store_id).await {
        Ok(store) => Json(json!({ "data": dto::store_to_json(&store) })).into_response(),
        Err(resp) => resp,
    }
}

pub async fn update_store(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(admin): Extension<AdminContext>,
    Path(store_id): Path<String>,
    Json(body): Json<dto::StoreRequest>,
) -> axum::response::Response {
    let mut store = match resolve_store(&services, &admin, &store_id).await {
        Ok(s) => s,
        Err(resp) => return resp,
    };

    if let Err(e) = store.update(body.name, body.description.unwrap_or_default()) {
        return errors::domain_error_to_response(e);
    }

    if let Err(e) = services.stores().update_store(&store).await {
        return errors::repo_error_to_response(e);
    }

    Json(json!({
        "message": "store updated",
        "data": dto::store_to_json(&store),
    }))
    .into_response()
}

pub async fn delete_store(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(admin): Extension<AdminContext>,
    Path(store_id): Path<String>,
) -> axum::response::Response {
    let store = match resolve_store(&services, &admin, &store_id).await {
        Ok(s) => s,
        Err(resp) => return resp,
    };

    if let Err(e) = services.stores().delete_store(admin.admin_id(), store.id).await {
        return errors::repo_error_to_response(e);
    }

    Json(json!({ "message": "store deleted" })).into_response()
}
