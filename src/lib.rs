pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;

use config::{Config, StorageBackend};
use db::{Cache, CacheWriterHandle, JournoRepository, MemoryRepository, PgRepository};
use routes::{create_router, AppState};

/// Opens the configured repository, running migrations for PostgreSQL
async fn open_repository(config: &Config) -> anyhow::Result<Arc<dyn JournoRepository>> {
    match config.storage {
        StorageBackend::Postgres => {
            let pool = db::create_pool(&config.database_url).await?;
            db::run_migrations(&pool).await?;
            tracing::info!("Connected to PostgreSQL");
            Ok(Arc::new(PgRepository::new(pool)))
        }
        StorageBackend::Memory => {
            tracing::info!("Using in-memory storage");
            Ok(Arc::new(MemoryRepository::new()))
        }
    }
}

async fn open_cache(config: &Config) -> anyhow::Result<Option<(Cache, CacheWriterHandle)>> {
    match &config.redis_url {
        Some(url) => {
            let client = db::create_redis_client(url)?;
            tracing::info!(ttl = config.score_cache_ttl, "Score cache enabled");
            Ok(Some(Cache::new(client).await))
        }
        None => {
            tracing::info!("No REDIS_URL set, score cache disabled");
            Ok(None)
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}

/// Builds the application from `config` and serves it until Ctrl-C
pub async fn run(config: Config) -> anyhow::Result<()> {
    let repo = open_repository(&config).await?;
    let (cache, cache_writer) = open_cache(&config).await?.unzip();

    if config.seed_on_startup {
        let stats = services::seed::seed_database(repo.as_ref(), cache.as_ref()).await?;
        tracing::info!(?stats, "Seeded sample dataset on startup");
    }

    let state = Arc::new(AppState::new(repo, cache, config.score_cache_ttl));
    let app = create_router(state);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(handle) = cache_writer {
        handle.shutdown().await;
    }

    Ok(())
}
