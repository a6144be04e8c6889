//! Repository error model.
//!
//! SQLx errors are mapped by PostgreSQL error code:
//!
//! | Code    | Scenario                    | RepoError          |
//! |---------|-----------------------------|--------------------|
//! | `23505` | Unique violation            | `Conflict`         |
//! | `23503` | Foreign key violation       | `InvalidReference` |
//! | `23514` | Check constraint violation  | `InvalidReference` |
//! | other   | Pool/network/decode errors  | `Storage`          |

use thiserror::Error;

pub type RepoResult<T> = Result<T, RepoError>;

#[derive(Debug, Error)]
pub enum RepoError {
    /// The row does not exist within the caller's scope.
    #[error("not found")]
    NotFound,

    /// A uniqueness rule was violated (duplicate email, username or SKU).
    #[error("conflict: {0}")]
    Conflict(String),

    /// A referenced row does not exist or a constraint rejected the data.
    #[error("invalid reference: {0}")]
    InvalidReference(String),

    /// The backing store failed (pool closed, network, decode).
    #[error("storage error: {0}")]
    Storage(String),
}

pub(crate) fn map_sqlx_error(operation: &str, err: sqlx::Error) -> RepoError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {}: {}", operation, db_err.message());

            match db_err.code().as_deref() {
                Some("23505") => RepoError::Conflict(msg),
                Some("23503") | Some("23514") => RepoError::InvalidReference(msg),
                _ => RepoError::Storage(msg),
            }
        }
        sqlx::Error::PoolClosed => {
            RepoError::Storage(format!("connection pool closed in {}", operation))
        }
        other => RepoError::Storage(format!("{}: {}", operation, other)),
    }
}

pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db_err) = err {
        if let Some(code) = db_err.code() {
            return code.as_ref() == "23505";
        }
    }
    false
}
