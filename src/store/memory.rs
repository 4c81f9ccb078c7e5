// src/store/memory.rs

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{error::AppError, models::quiz::Catalog, store::CatalogStore};

/// Keeps the last saved catalog in memory; nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    catalog: RwLock<Catalog>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_catalog(catalog: Catalog) -> Self {
        Self {
            catalog: RwLock::new(catalog),
        }
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn load(&self) -> Result<Catalog, AppError> {
        Ok(self.catalog.read().await.clone())
    }

    async fn save(&self, catalog: &Catalog) -> Result<(), AppError> {
        *self.catalog.write().await = catalog.clone();
        Ok(())
    }
}
