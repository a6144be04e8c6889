use std::sync::Arc;

use storecms_catalog::Store;
use storecms_core::StoreId;

use crate::app::{errors, services::AppServices};
use crate::context::AdminContext;

/// Resolve a store path segment against the current admin.
///
/// Cross-admin access comes back as the same 404 a missing store would, so
/// store IDs can't be probed across accounts.
pub async fn resolve_store(
    services: &Arc<AppServices>,
    admin: &AdminContext,
    store_id: &str,
) -> Result<Store, axum::response::Response> {
    let store_id: StoreId = errors::parse_id(store_id)?;

    match services.stores().store(admin.admin_id(), store_id).await {
        Ok(Some(store)) => Ok(store),
        Ok(None) => Err(errors::json_error(
            axum::http::StatusCode::NOT_FOUND,
            "not_found",
            "store not found",
        )),
        Err(e) => Err(errors::repo_error_to_response(e)),
    }
}
