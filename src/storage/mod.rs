//! Storage implementations for different backends

pub mod in_memory;
#[cfg(feature = "postgres")]
pub mod postgres;

pub use in_memory::InMemoryOrderStore;
#[cfg(feature = "postgres")]
pub use postgres::PostgresOrderStore;

use crate::config::{Fixtures, StorageBackend, StorageConfig};
use crate::core::OrderStore;
use anyhow::Result;
use std::sync::Arc;

/// Open the store selected by configuration
///
/// Fixtures only apply to the in-memory backend.
pub async fn open_store(config: &StorageConfig, fixtures: &Fixtures) -> Result<Arc<dyn OrderStore>> {
    match config.backend {
        StorageBackend::InMemory => {
            tracing::info!(
                activities = fixtures.activities.len(),
                observations = fixtures.observations.len(),
                causals = fixtures.causals.len(),
                "using in-memory store"
            );
            Ok(Arc::new(InMemoryOrderStore::with_fixtures(fixtures)?))
        }
        #[cfg(feature = "postgres")]
        StorageBackend::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("storage.database_url is required for postgres"))?;
            if !fixtures.is_empty() {
                tracing::warn!("fixtures are ignored by the postgres backend");
            }
            let store = PostgresOrderStore::connect(url, config.max_connections).await?;
            tracing::info!("using postgres store");
            Ok(Arc::new(store))
        }
        #[cfg(not(feature = "postgres"))]
        StorageBackend::Postgres => {
            anyhow::bail!("postgres backend requested but the `postgres` feature is not enabled")
        }
    }
}
