//! Database wiring: pool construction and migrations.

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::error::{map_sqlx_error, RepoError, RepoResult};

/// Connect to Postgres and bring the schema up to date.
///
/// Runs the embedded migrations before returning, so a successful `connect`
/// means the pool is usable. Any failure here must abort startup — serving
/// requests against a missing or stale schema is worse than not starting.
pub async fn connect(database_url: &str) -> RepoResult<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
        .map_err(|e| map_sqlx_error("connect", e))?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(|e| RepoError::Storage(format!("migrations failed: {}", e)))?;

    tracing::info!("database connected and migrated");
    Ok(pool)
}
