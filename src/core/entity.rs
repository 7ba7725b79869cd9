//! Records handled by the order resource
//!
//! `Order` is the only record this crate writes. `Activity`, `Observation`
//! and `Causal` are owned elsewhere: they are carried around as opaque
//! records whose attributes are passed through untouched.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Layout accepted for `legalization_date`
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A legalization order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub legalization_date: NaiveDate,
    pub address: String,
    pub city: String,
    pub observation_id: Option<i64>,
    pub causal_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Build a freshly stored order from validated input
    pub fn from_input(id: i64, input: OrderInput, now: DateTime<Utc>) -> Self {
        Self {
            id,
            legalization_date: input.legalization_date,
            address: input.address,
            city: input.city,
            observation_id: input.observation_id.flatten(),
            causal_id: input.causal_id.flatten(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrite this order with validated input
    ///
    /// The three mandatory fields are always replaced. A foreign key is only
    /// touched when the request carried it.
    pub fn apply(&mut self, input: OrderInput, now: DateTime<Utc>) {
        self.legalization_date = input.legalization_date;
        self.address = input.address;
        self.city = input.city;
        if let Some(observation_id) = input.observation_id {
            self.observation_id = observation_id;
        }
        if let Some(causal_id) = input.causal_id {
            self.causal_id = causal_id;
        }
        self.updated_at = now;
    }
}

/// Validated field set for create and update
///
/// Foreign keys use a nested option: `None` when the key was absent from the
/// request, `Some(None)` when it was sent as `null`.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderInput {
    pub legalization_date: NaiveDate,
    pub address: String,
    pub city: String,
    pub observation_id: Option<Option<i64>>,
    pub causal_id: Option<Option<i64>>,
}

/// A record owned by another resource, identified by its numeric id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpaqueRecord {
    pub id: i64,

    /// Every other column, passed through verbatim
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl OpaqueRecord {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            attributes: Map::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

pub type Activity = OpaqueRecord;
pub type Observation = OpaqueRecord;
pub type Causal = OpaqueRecord;

/// Order listing entry with its `observation` and `causal` loaded
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderWithRelations {
    #[serde(flatten)]
    pub order: Order,
    pub observation: Option<Observation>,
    pub causal: Option<Causal>,
}
