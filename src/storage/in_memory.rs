//! In-memory implementation of OrderStore for testing and development

use crate::config::Fixtures;
use crate::core::entity::{Activity, Causal, Observation, OpaqueRecord, Order, OrderInput};
use crate::core::OrderStore;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};

#[derive(Default)]
struct Tables {
    orders: BTreeMap<i64, Order>,
    next_order_id: i64,
    activities: HashMap<i64, Activity>,
    observations: HashMap<i64, Observation>,
    causals: HashMap<i64, Causal>,
    /// `(order_id, activity_id)` rows in insertion order; duplicates allowed
    order_activity: Vec<(i64, i64)>,
}

/// In-memory order store
///
/// Uses a single RwLock over all tables, so each call sees a consistent
/// snapshot. Order ids start at 1 and are never reused.
#[derive(Clone)]
pub struct InMemoryOrderStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryOrderStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            tables: Arc::new(RwLock::new(Tables {
                next_order_id: 1,
                ..Tables::default()
            })),
        }
    }

    /// Create a store preloaded with fixture records
    pub fn with_fixtures(fixtures: &Fixtures) -> Result<Self> {
        let store = Self::new();
        for activity in &fixtures.activities {
            store.insert_activity(activity.clone())?;
        }
        for observation in &fixtures.observations {
            store.insert_observation(observation.clone())?;
        }
        for causal in &fixtures.causals {
            store.insert_causal(causal.clone())?;
        }
        Ok(store)
    }

    pub fn insert_activity(&self, activity: OpaqueRecord) -> Result<()> {
        self.write()?.activities.insert(activity.id, activity);
        Ok(())
    }

    pub fn insert_observation(&self, observation: OpaqueRecord) -> Result<()> {
        self.write()?.observations.insert(observation.id, observation);
        Ok(())
    }

    pub fn insert_causal(&self, causal: OpaqueRecord) -> Result<()> {
        self.write()?.causals.insert(causal.id, causal);
        Ok(())
    }

    /// Number of association rows, duplicates included
    pub fn association_count(&self) -> usize {
        self.tables
            .read()
            .map(|t| t.order_activity.len())
            .unwrap_or_default()
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))
    }
}

impl Default for InMemoryOrderStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn list(&self) -> Result<Vec<Order>> {
        Ok(self.read()?.orders.values().cloned().collect())
    }

    async fn get(&self, id: i64) -> Result<Option<Order>> {
        Ok(self.read()?.orders.get(&id).cloned())
    }

    async fn create(&self, input: OrderInput) -> Result<Order> {
        let mut tables = self.write()?;

        let id = tables.next_order_id;
        tables.next_order_id += 1;

        let order = Order::from_input(id, input, Utc::now());
        tables.orders.insert(id, order.clone());

        Ok(order)
    }

    async fn update(&self, id: i64, input: OrderInput) -> Result<Option<Order>> {
        let mut tables = self.write()?;

        let Some(order) = tables.orders.get_mut(&id) else {
            return Ok(None);
        };
        order.apply(input, Utc::now());

        Ok(Some(order.clone()))
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let mut tables = self.write()?;

        tables.orders.remove(&id);
        tables.order_activity.retain(|(order_id, _)| *order_id != id);

        Ok(())
    }

    async fn get_activity(&self, id: i64) -> Result<Option<Activity>> {
        Ok(self.read()?.activities.get(&id).cloned())
    }

    async fn get_observation(&self, id: i64) -> Result<Option<Observation>> {
        Ok(self.read()?.observations.get(&id).cloned())
    }

    async fn get_causal(&self, id: i64) -> Result<Option<Causal>> {
        Ok(self.read()?.causals.get(&id).cloned())
    }

    async fn attach_activity(&self, order_id: i64, activity_id: i64) -> Result<()> {
        self.write()?.order_activity.push((order_id, activity_id));
        Ok(())
    }

    async fn detach_activity(&self, order_id: i64, activity_id: i64) -> Result<()> {
        self.write()?
            .order_activity
            .retain(|row| *row != (order_id, activity_id));
        Ok(())
    }

    async fn activities_of(&self, order_id: i64) -> Result<Vec<Activity>> {
        let tables = self.read()?;

        Ok(tables
            .order_activity
            .iter()
            .filter(|(o, _)| *o == order_id)
            .filter_map(|(_, a)| tables.activities.get(a).cloned())
            .collect())
    }
}
