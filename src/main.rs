use std::sync::Arc;

use axum::{serve, Router};
use dotenvy::dotenv;
use link_redirector::config::Config;
use link_redirector::routes::create_router;
use link_redirector::{LinkService, LinkStore, MemoryLinkStore, PgLinkStore};
use tokio::net::TcpListener;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

const DEFAULT_TRACING_LEVEL: &str = "link_redirector=debug,tower_http=debug";

#[tokio::main]
async fn main() {
    _ = dotenv();
    configure_tracing();
    let config = Config::from_env().expect("Reading configuration failed");
    let store = create_store(&config).await;
    let listener = create_listener(&config.server_address).await;
    let router = create_app(store, &config);
    serve(listener, router)
        .await
        .expect("Server failed to start");
}

fn configure_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or(DEFAULT_TRACING_LEVEL.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn create_store(config: &Config) -> Arc<dyn LinkStore> {
    if config.uses_memory_store() {
        tracing::warn!("Using in-memory link store; links are lost on restart");
        return Arc::new(MemoryLinkStore::new());
    }
    let store = PgLinkStore::connect(
        &config.database_url,
        config.max_connections,
        config.store_timeout,
    )
        .await
        .expect("Creating database connection pool failed");
    store.migrate().await.expect("Running database migrations failed");
    Arc::new(store)
}

async fn create_listener(server_address: &str) -> TcpListener {
    let listener = TcpListener::bind(&server_address)
        .await
        .expect("Creating tcp listener failed");
    tracing::info!("Listening on address: {}", server_address);
    listener
}

fn create_app(store: Arc<dyn LinkStore>, config: &Config) -> Router {
    create_router(LinkService::from_config(store, config))
}
