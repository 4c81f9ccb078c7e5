// src/main.rs

use std::sync::Arc;

use dotenvy::dotenv;
use quizhost::config::{Config, StoreBackend};
use quizhost::error::AppError;
use quizhost::routes;
use quizhost::state::AppState;
use quizhost::store::{CatalogStore, JsonFileStore, MemoryStore, SqliteStore};
use quizhost::QuizManager;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenv().ok();

    // Load configuration from environment
    let config = Config::from_env();

    let file_appender = tracing_appender::rolling::daily("logs", "quizhost.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    // Initialize Tracing (Logging)
    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    let store = match open_store(&config).await {
        Ok(store) => store,
        Err(e) => {
            tracing::error!("Failed to open catalog store: {}", e);
            std::process::exit(1);
        }
    };

    // A corrupt catalog stops startup instead of silently becoming empty.
    let catalog = match store.load().await {
        Ok(catalog) => catalog,
        Err(e) => {
            tracing::error!("Failed to load quiz catalog: {}", e);
            std::process::exit(1);
        }
    };
    tracing::info!("Catalog ready with {} quizzes", catalog.len());

    let bind_addr = config.bind_addr;
    let state = AppState::new(QuizManager::from_catalog(catalog), store, config);

    // Create the Axum application router
    let app = routes::create_router(state);

    tracing::info!("Listening on {}", bind_addr);
    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .expect("Failed to bind listening address");

    // Start the server
    axum::serve(listener, app).await.expect("Server error");
}

async fn open_store(config: &Config) -> Result<Arc<dyn CatalogStore>, AppError> {
    Ok(match config.store_backend {
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory catalog; quizzes are lost on restart");
            Arc::new(MemoryStore::new())
        }
        StoreBackend::Json => {
            tracing::info!("Using JSON catalog at {}", config.catalog_path.display());
            Arc::new(JsonFileStore::new(&config.catalog_path))
        }
        StoreBackend::Sqlite => {
            tracing::info!("Using SQLite catalog at {}", config.database_url);
            Arc::new(SqliteStore::connect(&config.database_url).await?)
        }
    })
}
