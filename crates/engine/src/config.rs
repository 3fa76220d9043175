//! Engine configuration from the environment.

use std::net::SocketAddr;

use axum::http::{HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DATABASE_URL: &str = "sqlite:catalog.db?mode=rwc";

/// Which adapter backs the catalog ports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreKind {
    #[default]
    Memory,
    Sqlite,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub server_host: String,
    pub server_port: u16,
    pub store: StoreKind,
    pub database_url: String,
    /// `*` or a comma-separated origin list. Unset disables CORS handling.
    pub cors_allowed_origins: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            server_host: DEFAULT_HOST.to_string(),
            server_port: DEFAULT_PORT,
            store: StoreKind::default(),
            database_url: DEFAULT_DATABASE_URL.to_string(),
            cors_allowed_origins: None,
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Unparseable values fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let defaults = Self::default();

        let server_port = match read("SERVER_PORT").or_else(|| read("PORT")) {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!(value = %raw, "Invalid SERVER_PORT, using {}", DEFAULT_PORT);
                DEFAULT_PORT
            }),
            None => defaults.server_port,
        };

        let store = match read("CATALOG_STORE").map(|s| s.to_ascii_lowercase()) {
            None => defaults.store,
            Some(kind) if kind == "memory" => StoreKind::Memory,
            Some(kind) if kind == "sqlite" => StoreKind::Sqlite,
            Some(other) => {
                tracing::warn!(value = %other, "Unknown CATALOG_STORE, using in-memory store");
                StoreKind::Memory
            }
        };

        Self {
            server_host: read("SERVER_HOST").unwrap_or(defaults.server_host),
            server_port,
            store,
            database_url: read("DATABASE_URL").unwrap_or(defaults.database_url),
            cors_allowed_origins: read("CORS_ALLOWED_ORIGINS"),
        }
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.server_host, self.server_port).parse()
    }

    pub fn cors_layer(&self) -> Option<CorsLayer> {
        let allowed_origins = self.cors_allowed_origins.as_deref()?;

        let mut cors = CorsLayer::new()
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([axum::http::header::CONTENT_TYPE]);

        if allowed_origins == "*" {
            cors = cors.allow_origin(Any);
        } else {
            let origins: Vec<HeaderValue> = allowed_origins
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .filter_map(|s| HeaderValue::from_str(s).ok())
                .collect();

            if origins.is_empty() {
                return None;
            }

            cors = cors.allow_origin(origins);
        }

        Some(cors)
    }
}

/// Load `.env.local` then `.env` from the workspace root, if present.
pub fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}
