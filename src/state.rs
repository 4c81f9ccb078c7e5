use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{config::Config, manager::QuizManager, store::CatalogStore};

/// Shared handler state.
///
/// The one `Mutex` around the manager serializes every session read-modify-write
/// and keeps catalog saves in mutation order.
#[derive(Clone)]
pub struct AppState {
    pub manager: Arc<Mutex<QuizManager>>,
    pub store: Arc<dyn CatalogStore>,
    pub config: Config,
}

impl AppState {
    pub fn new(manager: QuizManager, store: Arc<dyn CatalogStore>, config: Config) -> Self {
        Self {
            manager: Arc::new(Mutex::new(manager)),
            store,
            config,
        }
    }
}
