//! Store trait for order persistence
//!
//! Handlers depend only on [`OrderStore`]; the concrete storage mechanism is
//! chosen at startup.

use crate::core::entity::{Activity, Causal, Observation, Order, OrderInput, OrderWithRelations};
use anyhow::Result;
use async_trait::async_trait;

/// Persistence capability for orders and their activity associations
///
/// Activities, observations and causals are read-only here: the store only
/// resolves them by id.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// List all orders
    async fn list(&self) -> Result<Vec<Order>>;

    /// Get an order by id
    async fn get(&self, id: i64) -> Result<Option<Order>>;

    /// Insert a new order and return it with its assigned id
    async fn create(&self, input: OrderInput) -> Result<Order>;

    /// Overwrite an existing order
    ///
    /// Returns `None` if the order does not exist; it never inserts.
    async fn update(&self, id: i64, input: OrderInput) -> Result<Option<Order>>;

    /// Delete an order together with its activity associations
    async fn delete(&self, id: i64) -> Result<()>;

    /// Get an activity by id
    async fn get_activity(&self, id: i64) -> Result<Option<Activity>>;

    /// Get an observation by id
    async fn get_observation(&self, id: i64) -> Result<Option<Observation>>;

    /// Get a causal by id
    async fn get_causal(&self, id: i64) -> Result<Option<Causal>>;

    /// Add an association row
    ///
    /// Attaching a pair that is already associated adds another row.
    async fn attach_activity(&self, order_id: i64, activity_id: i64) -> Result<()>;

    /// Remove every association row for the pair; a missing pair is a no-op
    async fn detach_activity(&self, order_id: i64, activity_id: i64) -> Result<()>;

    /// Activities associated with an order, one entry per association row
    async fn activities_of(&self, order_id: i64) -> Result<Vec<Activity>>;

    /// List all orders with `observation` and `causal` loaded
    ///
    /// Foreign keys pointing at missing records load as `None`.
    async fn list_with_relations(&self) -> Result<Vec<OrderWithRelations>> {
        let orders = self.list().await?;
        let mut entries = Vec::with_capacity(orders.len());
        for order in orders {
            let observation = match order.observation_id {
                Some(id) => self.get_observation(id).await?,
                None => None,
            };
            let causal = match order.causal_id {
                Some(id) => self.get_causal(id).await?,
                None => None,
            };
            entries.push(OrderWithRelations {
                order,
                observation,
                causal,
            });
        }
        Ok(entries)
    }
}
