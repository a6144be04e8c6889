use core::str::FromStr;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use storecms_core::DomainError;
use storecms_infra::RepoError;

pub fn repo_error_to_response(err: RepoError) -> axum::response::Response {
    match err {
        RepoError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
        RepoError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
        RepoError::InvalidReference(msg) => {
            json_error(StatusCode::BAD_REQUEST, "invalid_reference", msg)
        }
        RepoError::Storage(msg) => {
            tracing::error!("storage error: {msg}");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "storage_error",
                "internal storage error",
            )
        }
    }
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        DomainError::InvariantViolation(msg) => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "invariant_violation", msg)
        }
        DomainError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
        DomainError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
        DomainError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
        DomainError::Unauthorized => json_error(StatusCode::FORBIDDEN, "unauthorized", "unauthorized"),
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

/// Parse a path/body identifier, mapping failure to a 400 response.
pub fn parse_id<T>(s: &str) -> Result<T, axum::response::Response>
where
    T: FromStr<Err = DomainError>,
{
    s.parse()
        .map_err(|e: DomainError| json_error(StatusCode::BAD_REQUEST, "invalid_id", e.to_string()))
}
