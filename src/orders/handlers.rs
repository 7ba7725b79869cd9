//! Order HTTP handlers
//!
//! Every handler resolves its route parameters first (404), then validates
//! the body where there is one (400), then issues a single store mutation.

use crate::config::{AttributeLabels, ResponseMessages};
use crate::core::binding::{resolve_activity, resolve_order};
use crate::core::entity::{Activity, Order, OrderInput, OrderWithRelations};
use crate::core::error::ApiError;
use crate::core::service::OrderStore;
use crate::core::validation::Validated;
use axum::{
    Json,
    extract::{FromRef, Path, State},
    http::StatusCode,
};
use serde::Serialize;
use std::sync::Arc;

/// Order-specific AppState
#[derive(Clone)]
pub struct OrderAppState {
    pub store: Arc<dyn OrderStore>,
    pub labels: Arc<AttributeLabels>,
    pub messages: Arc<ResponseMessages>,
}

impl FromRef<OrderAppState> for Arc<AttributeLabels> {
    fn from_ref(state: &OrderAppState) -> Self {
        state.labels.clone()
    }
}

/// Body of create and update responses
#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub message: String,
    pub order: Order,
}

/// Body of the delete response; `order` is the removed id
#[derive(Debug, Serialize)]
pub struct OrderDeletedResponse {
    pub message: String,
    pub order: i64,
}

/// Body of attach and detach responses
#[derive(Debug, Serialize)]
pub struct OrderActivityResponse {
    pub message: String,
    pub order_activity: Vec<Activity>,
}

/// GET /orders
pub async fn list_orders(
    State(state): State<OrderAppState>,
) -> Result<Json<Vec<OrderWithRelations>>, ApiError> {
    let orders = state.store.list_with_relations().await?;
    Ok(Json(orders))
}

/// POST /orders
pub async fn create_order(
    State(state): State<OrderAppState>,
    Validated { value: input }: Validated<OrderInput>,
) -> Result<(StatusCode, Json<OrderResponse>), ApiError> {
    let order = state.store.create(input).await?;
    tracing::info!(order_id = order.id, "order created");

    Ok((
        StatusCode::CREATED,
        Json(OrderResponse {
            message: state.messages.created.clone(),
            order,
        }),
    ))
}

/// GET /orders/{id}
pub async fn get_order(
    State(state): State<OrderAppState>,
    Path(id): Path<String>,
) -> Result<Json<Order>, ApiError> {
    let order = resolve_order(state.store.as_ref(), &id).await?;
    Ok(Json(order))
}

/// PUT|PATCH /orders/{id}
///
/// The body extraction result is taken as-is so a missing order answers 404
/// even when the body is also invalid.
pub async fn update_order(
    State(state): State<OrderAppState>,
    Path(id): Path<String>,
    payload: Result<Validated<OrderInput>, ApiError>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order = resolve_order(state.store.as_ref(), &id).await?;
    let input = payload?.into_inner();

    let order = state
        .store
        .update(order.id, input)
        .await?
        .ok_or_else(|| ApiError::not_found("order", order.id))?;
    tracing::info!(order_id = order.id, "order updated");

    Ok(Json(OrderResponse {
        message: state.messages.updated.clone(),
        order,
    }))
}

/// DELETE /orders/{id}
pub async fn delete_order(
    State(state): State<OrderAppState>,
    Path(id): Path<String>,
) -> Result<Json<OrderDeletedResponse>, ApiError> {
    let order = resolve_order(state.store.as_ref(), &id).await?;

    state.store.delete(order.id).await?;
    tracing::info!(order_id = order.id, "order deleted");

    Ok(Json(OrderDeletedResponse {
        message: state.messages.deleted.clone(),
        order: order.id,
    }))
}

/// POST /orders/{id}/activities/{activity_id}
pub async fn attach_activity(
    State(state): State<OrderAppState>,
    Path((id, activity_id)): Path<(String, String)>,
) -> Result<Json<OrderActivityResponse>, ApiError> {
    let order = resolve_order(state.store.as_ref(), &id).await?;
    let activity = resolve_activity(state.store.as_ref(), &activity_id).await?;

    state.store.attach_activity(order.id, activity.id).await?;
    tracing::info!(order_id = order.id, activity_id = activity.id, "activity attached");

    Ok(Json(OrderActivityResponse {
        message: state.messages.activity_attached.clone(),
        order_activity: state.store.activities_of(order.id).await?,
    }))
}

/// DELETE /orders/{id}/activities/{activity_id}
pub async fn detach_activity(
    State(state): State<OrderAppState>,
    Path((id, activity_id)): Path<(String, String)>,
) -> Result<Json<OrderActivityResponse>, ApiError> {
    let order = resolve_order(state.store.as_ref(), &id).await?;
    let activity = resolve_activity(state.store.as_ref(), &activity_id).await?;

    state.store.detach_activity(order.id, activity.id).await?;
    tracing::info!(order_id = order.id, activity_id = activity.id, "activity detached");

    Ok(Json(OrderActivityResponse {
        message: state.messages.activity_detached.clone(),
        order_activity: state.store.activities_of(order.id).await?,
    }))
}
