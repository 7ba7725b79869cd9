//! Route parameter resolution
//!
//! Turns the raw `{id}` segments of a route into stored records, failing
//! with a 404 before any other work happens. Segments that are not integers
//! can never match a row, so they are reported as not found as well.

use crate::core::entity::{Activity, Order};
use crate::core::error::ApiError;
use crate::core::service::OrderStore;

fn parse_route_id(raw: &str) -> Option<i64> {
    raw.parse().ok()
}

/// Resolve an `{id}` segment to an order
pub async fn resolve_order(store: &dyn OrderStore, raw_id: &str) -> Result<Order, ApiError> {
    let Some(id) = parse_route_id(raw_id) else {
        return Err(ApiError::not_found("order", raw_id));
    };
    store
        .get(id)
        .await?
        .ok_or_else(|| ApiError::not_found("order", id))
}

/// Resolve an `{activity_id}` segment to an activity
pub async fn resolve_activity(store: &dyn OrderStore, raw_id: &str) -> Result<Activity, ApiError> {
    let Some(id) = parse_route_id(raw_id) else {
        return Err(ApiError::not_found("activity", raw_id));
    };
    store
        .get_activity(id)
        .await?
        .ok_or_else(|| ApiError::not_found("activity", id))
}
