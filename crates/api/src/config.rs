/// Environment-backed application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Listen address, `BIND_ADDR` (default `0.0.0.0:8080`).
    pub bind_addr: String,

    /// Postgres URL, `DATABASE_URL`. When unset the server runs on in-memory
    /// repositories (dev mode); nothing survives a restart.
    pub database_url: Option<String>,

    /// HS256 secret for session tokens, `JWT_SECRET`.
    pub jwt_secret: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let bind_addr =
            std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        let database_url = std::env::var("DATABASE_URL").ok();

        let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!("JWT_SECRET not set; using insecure dev default");
            "dev-secret".to_string()
        });

        Self {
            bind_addr,
            database_url,
            jwt_secret,
        }
    }
}
