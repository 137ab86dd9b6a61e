use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use streamflix_api::{
    config::Config,
    db::{create_pool, create_redis_client, run_migrations, Cache, MemoryStore, PgStore, Store},
    routes::{create_router, AppState},
    services::{CatalogProvider, CredentialService, EventSource, MockEventProvider, TmdbProvider},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let store: Arc<dyn Store> = match &config.database_url {
        Some(url) => {
            let pool = create_pool(url, config.database_name.as_deref()).await?;
            run_migrations(&pool).await?;
            Arc::new(PgStore::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory store");
            Arc::new(MemoryStore::new())
        }
    };

    let (cache, cache_handle) = match &config.redis_url {
        Some(url) => Cache::new(create_redis_client(url)?),
        None => {
            tracing::info!("REDIS_URL not set, catalog responses are not cached");
            Cache::disabled()
        }
    };

    let cache_enabled = cache.is_enabled();
    let catalog: Arc<dyn CatalogProvider> = Arc::new(
        TmdbProvider::new(cache, config.tmdb_api_key.clone(), config.tmdb_api_url.clone())
            .with_image_urls(
                config.tmdb_image_url.clone(),
                config.tmdb_backdrop_url.clone(),
            ),
    );
    let events: Arc<dyn EventSource> = Arc::new(MockEventProvider::new());

    if config.uses_dev_secret() {
        tracing::warn!("JWT_SECRET not set, signing tokens with the development secret");
    }
    let credentials = Arc::new(CredentialService::new(
        &config.jwt_secret,
        config.token_validity()?,
    ));

    tracing::info!(
        store = store.name(),
        catalog = catalog.name(),
        cache_enabled,
        events = events.name(),
        token_validity_days = credentials.validity().num_days(),
        "Services initialized"
    );

    let app = create_router(AppState {
        store,
        catalog,
        events,
        credentials,
    });

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(%address, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    cache_handle.shutdown().await;
    tracing::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
