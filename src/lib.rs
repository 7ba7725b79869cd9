//! # orderapi
//!
//! A REST resource for legalization orders, with validated create/update and an
//! order ↔ activity association.
//!
//! ## Features
//!
//! - **CRUD**: list, create, show, update and delete orders
//! - **Validation**: fixed rule set with per-field, localized messages
//! - **Route binding**: unknown ids answer 404 before the body is looked at
//! - **Associations**: attach and detach activities, list with observation and causal
//! - **Pluggable storage**: in-memory by default, PostgreSQL behind the `postgres` feature
//! - **Configuration-Based**: labels, messages and fixtures from YAML
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use orderapi::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     ServerBuilder::new()
//!         .with_store(InMemoryOrderStore::new())
//!         .with_config(AppConfig::default())
//!         .serve()
//!         .await
//! }
//! ```

pub mod config;
pub mod core;
pub mod orders;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        binding::{resolve_activity, resolve_order},
        entity::{Activity, Causal, Observation, OpaqueRecord, Order, OrderInput, OrderWithRelations},
        error::{ApiError, ValidationErrors},
        service::OrderStore,
        validation::{RuleSet, ValidatableEntity, Validated},
    };

    // === Orders ===
    pub use crate::orders::{OrderAppState, build_order_routes, order_rules};

    // === Storage ===
    pub use crate::storage::{InMemoryOrderStore, open_store};
    #[cfg(feature = "postgres")]
    pub use crate::storage::PostgresOrderStore;

    // === Config ===
    pub use crate::config::{
        AppConfig, AttributeLabels, Fixtures, ResponseMessages, ServerConfig, StorageBackend,
        StorageConfig,
    };

    // === Server ===
    pub use crate::server::ServerBuilder;

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, NaiveDate, Utc};
    pub use serde::{Deserialize, Serialize};
}
