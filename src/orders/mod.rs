//! Order resource module

pub mod handlers;
pub mod model;

pub use handlers::*;
pub use model::order_rules;

use axum::{
    Router,
    routing::{get, post},
};

/// Build the order routes
///
/// - GET    /orders
/// - POST   /orders
/// - GET    /orders/{id}
/// - PUT    /orders/{id}
/// - PATCH  /orders/{id}
/// - DELETE /orders/{id}
/// - POST   /orders/{id}/activities/{activity_id}
/// - DELETE /orders/{id}/activities/{activity_id}
pub fn build_order_routes(state: OrderAppState) -> Router {
    Router::new()
        .route("/orders", get(list_orders).post(create_order))
        .route(
            "/orders/{id}",
            get(get_order)
                .put(update_order)
                .patch(update_order)
                .delete(delete_order),
        )
        .route(
            "/orders/{id}/activities/{activity_id}",
            post(attach_activity).delete(detach_activity),
        )
        .with_state(state)
}
