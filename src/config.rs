// src/config.rs

use std::{env, net::SocketAddr, path::PathBuf};

use dotenvy::dotenv;
use url::Url;

/// Which catalog backend the server persists quizzes with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    Json,
    Sqlite,
}

impl StoreBackend {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "memory" => Some(Self::Memory),
            "json" => Some(Self::Json),
            "sqlite" => Some(Self::Sqlite),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub store_backend: StoreBackend,
    pub catalog_path: PathBuf,
    pub database_url: String,
    /// Base of the shareable join links, e.g. `http://quiz.example.org/`.
    pub public_base_url: Url,
    pub bind_addr: SocketAddr,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let store_backend = env::var("STORE_BACKEND")
            .map(|v| StoreBackend::parse(&v).expect("STORE_BACKEND must be memory, json or sqlite"))
            .unwrap_or(StoreBackend::Json);

        let catalog_path = env::var("CATALOG_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("quizzes.json"));

        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://quizzes.db?mode=rwc".to_string());

        let public_base_url = env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:5000/".to_string());
        let public_base_url =
            Url::parse(&public_base_url).expect("PUBLIC_BASE_URL must be a valid URL");

        let bind_addr = env::var("BIND_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:5000".to_string())
            .parse()
            .expect("BIND_ADDR must be a socket address");

        let rust_log = env::var("RUST_LOG")
            .unwrap_or_else(|_| "info".to_string());

        Self {
            store_backend,
            catalog_path,
            database_url,
            public_base_url,
            bind_addr,
            rust_log,
        }
    }

    /// In-memory configuration used by tests and ephemeral runs.
    pub fn ephemeral(public_base_url: Url) -> Self {
        Self {
            store_backend: StoreBackend::Memory,
            catalog_path: PathBuf::from("quizzes.json"),
            database_url: "sqlite::memory:".to_string(),
            public_base_url,
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            rust_log: "error".to_string(),
        }
    }
}
