//! Server module for building the HTTP server
//!
//! This module provides a `ServerBuilder` that registers:
//! - CRUD and association routes for orders
//! - Health routes
//! - Request tracing

pub mod builder;
pub mod router;

pub use builder::ServerBuilder;
