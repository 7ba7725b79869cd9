use anyhow::Result;
use orderapi::config::AppConfig;
use orderapi::server::ServerBuilder;
use orderapi::storage::open_store;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("orderapi=info,tower_http=info")),
        )
        .init();

    let config = AppConfig::load()?;
    let store = open_store(&config.storage, &config.fixtures).await?;

    tracing::info!(
        backend = ?config.storage.backend,
        addr = %config.server.addr(),
        "starting order api"
    );

    ServerBuilder::new()
        .with_shared_store(store)
        .with_config(config)
        .serve()
        .await
}
