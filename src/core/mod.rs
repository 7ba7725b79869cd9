//! Core module containing the records, store trait, errors and validation

pub mod binding;
pub mod entity;
pub mod error;
pub mod service;
pub mod validation;

pub use entity::{Activity, Causal, Observation, OpaqueRecord, Order, OrderInput, OrderWithRelations};
pub use error::{ApiError, ValidationErrors};
pub use service::OrderStore;
