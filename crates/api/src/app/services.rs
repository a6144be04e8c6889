use std::sync::Arc;

use storecms_infra::{
    db, AdminRepo, CategoryRepo, InMemoryCatalog, PostgresCatalog, ProductRepo, StoreRepo,
    VariantRepo,
};

use crate::config::AppConfig;

/// Repository wiring behind one handle.
///
/// Both variants implement every repository trait with identical scoping
/// rules, so handlers don't care which backend they run on.
#[derive(Clone)]
pub enum AppServices {
    InMemory { catalog: Arc<InMemoryCatalog> },
    Postgres { catalog: Arc<PostgresCatalog> },
}

/// Build services from config: Postgres when `DATABASE_URL` is set (connects
/// and migrates before returning), in-memory otherwise.
pub async fn build_services(config: &AppConfig) -> anyhow::Result<AppServices> {
    match &config.database_url {
        Some(url) => {
            let pool = db::connect(url).await?;
            Ok(AppServices::Postgres {
                catalog: Arc::new(PostgresCatalog::new(pool)),
            })
        }
        None => {
            tracing::warn!("DATABASE_URL not set; using in-memory repositories");
            Ok(AppServices::in_memory())
        }
    }
}

impl AppServices {
    pub fn in_memory() -> Self {
        AppServices::InMemory {
            catalog: Arc::new(InMemoryCatalog::new()),
        }
    }

    pub fn admins(&self) -> &dyn AdminRepo {
        match self {
            AppServices::InMemory { catalog } => catalog.as_ref(),
            AppServices::Postgres { catalog } => catalog.as_ref(),
        }
    }

    pub fn stores(&self) -> &dyn StoreRepo {
        match self {
            AppServices::InMemory { catalog } => catalog.as_ref(),
            AppServices::Postgres { catalog } => catalog.as_ref(),
        }
    }

    pub fn categories(&self) -> &dyn CategoryRepo {
        match self {
            AppServices::InMemory { catalog } => catalog.as_ref(),
            AppServices::Postgres { catalog } => catalog.as_ref(),
        }
    }

    pub fn variants(&self) -> &dyn VariantRepo {
        match self {
            AppServices::InMemory { catalog } => catalog.as_ref(),
            AppServices::Postgres { catalog } => catalog.as_ref(),
        }
    }

    pub fn products(&self) -> &dyn ProductRepo {
        match self {
            AppServices::InMemory { catalog } => catalog.as_ref(),
            AppServices::Postgres { catalog } => catalog.as_ref(),
        }
    }
}
