use axum::{routing::get, Router};

pub mod auth;
pub mod categories;
pub mod common;
pub mod products;
pub mod stores;
pub mod system;
pub mod variants;

/// Router for all authenticated (admin-scoped) endpoints.
///
/// Categories, variants and products are nested under their store inside
/// [`stores::router`].
pub fn router() -> Router {
    Router::new()
        .route("/admin", get(auth::current_admin))
        .nest("/stores", stores::router())
}
