use anyhow::Context;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; explicit env vars always win.
    let _ = dotenvy::dotenv();

    storecms_observability::init();

    let config = storecms_api::config::AppConfig::from_env();

    // Repositories first: a failed DB connection or migration must abort
    // startup instead of serving a half-initialized router.
    let services = storecms_api::app::services::build_services(&config)
        .await
        .context("failed to initialize repositories")?;

    let app = storecms_api::app::build_app(services, &config.jwt_secret);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
