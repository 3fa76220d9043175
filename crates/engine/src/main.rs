//! EventVenue Engine - Main entry point.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use eventvenue_engine::{
    api,
    config::{load_dotenv_from_repo_root, EngineConfig, StoreKind},
    infrastructure::{clock::SystemClock, ports::ClockPort, sqlite::SqliteCatalogStore},
    App,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from repo root (the binary may run from `crates/engine`).
    load_dotenv_from_repo_root();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "eventvenue_engine=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting EventVenue Engine");

    let config = EngineConfig::from_env();
    let clock: Arc<dyn ClockPort> = Arc::new(SystemClock);

    let app = match config.store {
        StoreKind::Memory => {
            tracing::info!("Using in-memory catalog store");
            App::in_memory(clock)
        }
        StoreKind::Sqlite => {
            tracing::info!(url = %config.database_url, "Using SQLite catalog store");
            let store =
                Arc::new(SqliteCatalogStore::connect(&config.database_url, clock.clone()).await?);
            App::new(store.clone(), store, clock)
        }
    };

    let mut router = api::router(Arc::new(app));
    if let Some(cors) = config.cors_layer() {
        router = router.layer(cors);
    }

    // Start server
    let addr = config.socket_addr()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
