// src/store/mod.rs

pub mod json_file;
pub mod memory;
pub mod sqlite;

use async_trait::async_trait;

use crate::{error::AppError, models::quiz::Catalog};

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Persistence seam for the quiz catalog.
///
/// Stores always move the whole catalog: `load` once before first use and
/// `save` after every mutation. Live sessions are never persisted.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn load(&self) -> Result<Catalog, AppError>;

    async fn save(&self, catalog: &Catalog) -> Result<(), AppError>;
}
