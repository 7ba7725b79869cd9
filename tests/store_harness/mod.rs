//! Shared test harness for order store backends
//!
//! Provides the `SeedRecords` trait (each backend knows how to insert the
//! externally owned activity, observation and causal rows), input builders,
//! and the `order_store_tests!` conformance suite.
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! #[macro_use]
//! mod store_harness;
//! use store_harness::*;
//! ```

#![allow(dead_code)]

#[macro_use]
pub mod order_store_tests;

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use orderapi::core::entity::{OpaqueRecord, OrderInput};
use orderapi::storage::InMemoryOrderStore;

/// Insert records the order store only ever reads
#[async_trait]
pub trait SeedRecords {
    async fn seed_activity(&self, id: i64, description: &str) -> Result<()>;
    async fn seed_observation(&self, id: i64, description: &str) -> Result<()>;
    async fn seed_causal(&self, id: i64, description: &str) -> Result<()>;
}

#[async_trait]
impl SeedRecords for InMemoryOrderStore {
    async fn seed_activity(&self, id: i64, description: &str) -> Result<()> {
        self.insert_activity(record(id, description))
    }

    async fn seed_observation(&self, id: i64, description: &str) -> Result<()> {
        self.insert_observation(record(id, description))
    }

    async fn seed_causal(&self, id: i64, description: &str) -> Result<()> {
        self.insert_causal(record(id, description))
    }
}

/// The shape every backend returns for a seeded record
pub fn record(id: i64, description: &str) -> OpaqueRecord {
    OpaqueRecord::new(id).with_attribute("description", description)
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Input with no foreign keys
pub fn order_input(address: &str, city: &str) -> OrderInput {
    OrderInput {
        legalization_date: date(2024, 1, 15),
        address: address.to_string(),
        city: city.to_string(),
        observation_id: None,
        causal_id: None,
    }
}

/// Input carrying both foreign keys
pub fn order_input_with_refs(address: &str, observation_id: i64, causal_id: i64) -> OrderInput {
    OrderInput {
        observation_id: Some(Some(observation_id)),
        causal_id: Some(Some(causal_id)),
        ..order_input(address, "Springfield")
    }
}
