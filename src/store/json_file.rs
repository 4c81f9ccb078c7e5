// src/store/json_file.rs

use std::{io::ErrorKind, path::PathBuf};

use async_trait::async_trait;

use crate::{error::AppError, models::quiz::Catalog, store::CatalogStore};

/// Stores the catalog as one JSON document keyed by quiz name.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CatalogStore for JsonFileStore {
    /// A missing file is an empty catalog; an unreadable or corrupt one is an error.
    async fn load(&self) -> Result<Catalog, AppError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!("Catalog file {} not found, starting empty", self.path.display());
                return Ok(Catalog::default());
            }
            Err(e) => {
                tracing::error!("Failed to read catalog file {}: {:?}", self.path.display(), e);
                return Err(e.into());
            }
        };

        let catalog: Catalog = serde_json::from_slice(&bytes)?;
        tracing::info!("Loaded {} quizzes from {}", catalog.len(), self.path.display());
        Ok(catalog)
    }

    async fn save(&self, catalog: &Catalog) -> Result<(), AppError> {
        let json = serde_json::to_vec_pretty(catalog)?;

        // Write a sibling then rename so readers never see a half-written file.
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        tracing::debug!("Saved {} quizzes to {}", catalog.len(), self.path.display());
        Ok(())
    }
}
