use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::{Duration, Utc};
use serde_json::json;

use storecms_auth::{hash_password, validate_policy, verify_password, Admin, Hs256Jwt, JwtClaims};
use storecms_core::AdminId;

use crate::app::{dto, errors, services::AppServices};
use crate::context::AdminContext;
use crate::middleware::AUTH_COOKIE;

/// Session lifetime. The cookie itself is a session cookie; the token inside
/// carries the hard expiry.
const TOKEN_TTL_HOURS: i64 = 72;

pub async fn signup(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(jwt): Extension<Arc<Hs256Jwt>>,
    jar: CookieJar,
    Json(body): Json<dto::SignupRequest>,
) -> axum::response::Response {
    if let Err(e) = validate_policy(&body.password) {
        return errors::json_error(StatusCode::BAD_REQUEST, "weak_password", e.to_string());
    }

    let password_hash = match hash_password(&body.password) {
        Ok(h) => h,
        Err(e) => {
            tracing::error!("password hashing failed: {e}");
            return errors::json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "hash_error",
                "failed to process password",
            );
        }
    };

    let admin = match Admin::new(body.username, body.email, password_hash, Utc::now()) {
        Ok(a) => a,
        Err(e) => return errors::domain_error_to_response(e),
    };

    if let Err(e) = services.admins().create_admin(&admin).await {
        return errors::repo_error_to_response(e);
    }

    let token = match mint_token(&jwt, admin.id) {
        Ok(t) => t,
        Err(resp) => return resp,
    };

    (
        jar.add(session_cookie(token)),
        (
            StatusCode::CREATED,
            Json(json!({
                "message": "signup successful",
                "data": dto::admin_to_json(&admin, &[]),
            })),
        ),
    )
        .into_response()
}

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(jwt): Extension<Arc<Hs256Jwt>>,
    jar: CookieJar,
    Json(body): Json<dto::LoginRequest>,
) -> axum::response::Response {
    let email = body.email.trim().to_lowercase();

    let admin = match services.admins().admin_by_email(&email).await {
        Ok(Some(a)) => a,
        Ok(None) => return invalid_credentials(),
        Err(e) => return errors::repo_error_to_response(e),
    };

    match verify_password(&body.password, &admin.password_hash) {
        Ok(true) => {}
        Ok(false) => return invalid_credentials(),
        Err(e) => {
            tracing::error!("password verification failed: {e}");
            return invalid_credentials();
        }
    }

    let stores = match services.stores().stores_for_admin(admin.id).await {
        Ok(s) => s,
        Err(e) => return errors::repo_error_to_response(e),
    };

    let token = match mint_token(&jwt, admin.id) {
        Ok(t) => t,
        Err(resp) => return resp,
    };

    (
        jar.add(session_cookie(token)),
        Json(json!({
            "message": "login successful",
            "data": dto::admin_to_json(&admin, &stores),
        })),
    )
        .into_response()
}

pub async fn logout(jar: CookieJar) -> axum::response::Response {
    (
        jar.remove(Cookie::build(AUTH_COOKIE).path("/")),
        Json(json!({ "message": "logged out" })),
    )
        .into_response()
}

/// `GET /admin` — the authenticated admin with their stores.
pub async fn current_admin(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AdminContext>,
) -> axum::response::Response {
    let admin = match services.admins().admin_by_id(ctx.admin_id()).await {
        Ok(Some(a)) => a,
        // Valid token for a deleted account: treat as unauthenticated.
        Ok(None) => {
            return errors::json_error(
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                "account no longer exists",
            )
        }
        Err(e) => return errors::repo_error_to_response(e),
    };

    let stores = match services.stores().stores_for_admin(admin.id).await {
        Ok(s) => s,
        Err(e) => return errors::repo_error_to_response(e),
    };

    Json(json!({ "data": dto::admin_to_json(&admin, &stores) })).into_response()
}

fn invalid_credentials() -> axum::response::Response {
    errors::json_error(
        StatusCode::UNAUTHORIZED,
        "invalid_credentials",
        "invalid email or password",
    )
}

fn mint_token(jwt: &Hs256Jwt, admin_id: AdminId) -> Result<String, axum::response::Response> {
    let now = Utc::now();
    let claims = JwtClaims {
        sub: admin_id,
        issued_at: now,
        expires_at: now + Duration::hours(TOKEN_TTL_HOURS),
    };

    jwt.sign(&claims).map_err(|e| {
        tracing::error!("failed to sign session token: {e}");
        errors::json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "token_error",
            "failed to issue session token",
        )
    })
}

fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((AUTH_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}
