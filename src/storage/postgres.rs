//! PostgreSQL storage backend using sqlx.
//!
//! Provides `PostgresOrderStore`, an `OrderStore` backed by a
//! `sqlx::PgPool`.
//!
//! # Feature flag
//!
//! This module is gated behind the `postgres` feature flag:
//! ```toml
//! [dependencies]
//! orderapi = { version = "0.1", features = ["postgres"] }
//! ```
//!
//! # Schema
//!
//! Orders live in an `orders` table; associations in `order_activity`
//! (no payload, no uniqueness constraint). Activities, observations and
//! causals belong to other services: they are read with `to_jsonb(row)`, so
//! whatever columns those tables carry are passed through.

use crate::core::entity::{Activity, Causal, Observation, OpaqueRecord, Order, OrderInput};
use crate::core::OrderStore;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};

// ---------------------------------------------------------------------------
// Schema management
// ---------------------------------------------------------------------------

const REFERENCED_TABLES: &[(&str, &str)] = &[
    (
        "activities",
        "CREATE TABLE IF NOT EXISTS activities (id BIGSERIAL PRIMARY KEY, description TEXT)",
    ),
    (
        "observations",
        "CREATE TABLE IF NOT EXISTS observations (id BIGSERIAL PRIMARY KEY, description TEXT)",
    ),
    (
        "causals",
        "CREATE TABLE IF NOT EXISTS causals (id BIGSERIAL PRIMARY KEY, description TEXT)",
    ),
];

/// Apply the required tables and indexes (idempotent).
///
/// The referenced tables are only created when missing, with an `id` and a
/// `description` column, so a fresh database is usable on its own.
pub async fn ensure_schema(pool: &PgPool) -> Result<()> {
    for &(table, ddl) in REFERENCED_TABLES {
        sqlx::query(ddl)
            .execute(pool)
            .await
            .map_err(|e| anyhow!("Failed to create {} table: {}", table, e))?;
    }

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS orders (
            id BIGSERIAL PRIMARY KEY,
            legalization_date DATE NOT NULL,
            address VARCHAR(50) NOT NULL,
            city VARCHAR(50) NOT NULL,
            observation_id BIGINT NULL,
            causal_id BIGINT NULL,
            created_at TIMESTAMPTZ NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL
        )",
    )
    .execute(pool)
    .await
    .map_err(|e| anyhow!("Failed to create orders table: {}", e))?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS order_activity (
            order_id BIGINT NOT NULL REFERENCES orders(id) ON DELETE CASCADE,
            activity_id BIGINT NOT NULL REFERENCES activities(id) ON DELETE CASCADE
        )",
    )
    .execute(pool)
    .await
    .map_err(|e| anyhow!("Failed to create order_activity table: {}", e))?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_order_activity_order ON order_activity (order_id)",
    )
    .execute(pool)
    .await
    .map_err(|e| anyhow!("Failed to create order_activity index: {}", e))?;

    Ok(())
}

// ---------------------------------------------------------------------------
// Row conversion
// ---------------------------------------------------------------------------

fn row_to_order(row: &PgRow) -> Result<Order> {
    Ok(Order {
        id: row.try_get("id")?,
        legalization_date: row.try_get("legalization_date")?,
        address: row.try_get("address")?,
        city: row.try_get("city")?,
        observation_id: row.try_get("observation_id")?,
        causal_id: row.try_get("causal_id")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn row_to_record(row: &PgRow) -> Result<OpaqueRecord> {
    let value: serde_json::Value = row.try_get("record")?;
    serde_json::from_value(value).map_err(|e| anyhow!("Failed to decode record: {}", e))
}

// ---------------------------------------------------------------------------
// PostgresOrderStore
// ---------------------------------------------------------------------------

/// Order store backed by PostgreSQL.
#[derive(Clone, Debug)]
pub struct PostgresOrderStore {
    pool: PgPool,
}

impl PostgresOrderStore {
    /// Create a new `PostgresOrderStore` with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a pool, apply the schema and return the store
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(|e| anyhow!("Failed to connect to PostgreSQL: {}", e))?;
        ensure_schema(&pool).await?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn get_record(&self, sql: &'static str, id: i64) -> Result<Option<OpaqueRecord>> {
        let row = sqlx::query(sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| anyhow!("Failed to fetch record {}: {}", id, e))?;
        row.as_ref().map(row_to_record).transpose()
    }
}

#[async_trait]
impl OrderStore for PostgresOrderStore {
    async fn list(&self) -> Result<Vec<Order>> {
        let rows = sqlx::query(
            "SELECT id, legalization_date, address, city, observation_id, causal_id,
                    created_at, updated_at
             FROM orders ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| anyhow!("Failed to list orders: {}", e))?;

        rows.iter().map(row_to_order).collect()
    }

    async fn get(&self, id: i64) -> Result<Option<Order>> {
        let row = sqlx::query(
            "SELECT id, legalization_date, address, city, observation_id, causal_id,
                    created_at, updated_at
             FROM orders WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| anyhow!("Failed to get order {}: {}", id, e))?;

        row.as_ref().map(row_to_order).transpose()
    }

    async fn create(&self, input: OrderInput) -> Result<Order> {
        let now = Utc::now();
        let row = sqlx::query(
            "INSERT INTO orders
                (legalization_date, address, city, observation_id, causal_id, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $6)
             RETURNING id, legalization_date, address, city, observation_id, causal_id,
                       created_at, updated_at",
        )
        .bind(input.legalization_date)
        .bind(&input.address)
        .bind(&input.city)
        .bind(input.observation_id.flatten())
        .bind(input.causal_id.flatten())
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| anyhow!("Failed to create order: {}", e))?;

        row_to_order(&row)
    }

    async fn update(&self, id: i64, input: OrderInput) -> Result<Option<Order>> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(
            "SELECT id, legalization_date, address, city, observation_id, causal_id,
                    created_at, updated_at
             FROM orders WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| anyhow!("Failed to lock order {}: {}", id, e))?;
        let Some(row) = row else {
            return Ok(None);
        };

        let mut order = row_to_order(&row)?;
        order.apply(input, Utc::now());

        sqlx::query(
            "UPDATE orders
             SET legalization_date = $2, address = $3, city = $4,
                 observation_id = $5, causal_id = $6, updated_at = $7
             WHERE id = $1",
        )
        .bind(order.id)
        .bind(order.legalization_date)
        .bind(&order.address)
        .bind(&order.city)
        .bind(order.observation_id)
        .bind(order.causal_id)
        .bind(order.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| anyhow!("Failed to update order {}: {}", id, e))?;

        tx.commit().await?;
        Ok(Some(order))
    }

    async fn delete(&self, id: i64) -> Result<()> {
        sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| anyhow!("Failed to delete order {}: {}", id, e))?;
        Ok(())
    }

    async fn get_activity(&self, id: i64) -> Result<Option<Activity>> {
        self.get_record("SELECT to_jsonb(t) AS record FROM activities t WHERE t.id = $1", id)
            .await
    }

    async fn get_observation(&self, id: i64) -> Result<Option<Observation>> {
        self.get_record("SELECT to_jsonb(t) AS record FROM observations t WHERE t.id = $1", id)
            .await
    }

    async fn get_causal(&self, id: i64) -> Result<Option<Causal>> {
        self.get_record("SELECT to_jsonb(t) AS record FROM causals t WHERE t.id = $1", id)
            .await
    }

    async fn attach_activity(&self, order_id: i64, activity_id: i64) -> Result<()> {
        sqlx::query("INSERT INTO order_activity (order_id, activity_id) VALUES ($1, $2)")
            .bind(order_id)
            .bind(activity_id)
            .execute(&self.pool)
            .await
            .map_err(|e| anyhow!("Failed to attach activity: {}", e))?;
        Ok(())
    }

    async fn detach_activity(&self, order_id: i64, activity_id: i64) -> Result<()> {
        sqlx::query("DELETE FROM order_activity WHERE order_id = $1 AND activity_id = $2")
            .bind(order_id)
            .bind(activity_id)
            .execute(&self.pool)
            .await
            .map_err(|e| anyhow!("Failed to detach activity: {}", e))?;
        Ok(())
    }

    async fn activities_of(&self, order_id: i64) -> Result<Vec<Activity>> {
        let rows = sqlx::query(
            "SELECT to_jsonb(a) AS record
             FROM order_activity oa
             JOIN activities a ON a.id = oa.activity_id
             WHERE oa.order_id = $1
             ORDER BY a.id",
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| anyhow!("Failed to list activities of order {}: {}", order_id, e))?;

        rows.iter().map(row_to_record).collect()
    }
}
