use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::Json;
use axum::Router;
use chrono::{Duration, Local, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::engine::{hours, lifecycle};
use crate::error::AppError;
use crate::models::actor::ActorRole;
use crate::models::order::{DeliveryType, LineItem, Order, OrderStatus, PaymentMethod};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/orders", post(create_order).get(list_orders))
        .route("/orders/:id", get(get_order))
        .route("/orders/:id/advance", post(advance_order))
        .route("/orders/:id/approve-payment", post(approve_payment))
        .route("/orders/:id/cancel", post(cancel_order))
}

#[derive(Deserialize)]
pub struct CreateOrderRequest {
    pub branch_id: Uuid,
    pub customer_id: Option<Uuid>,
    pub items: Vec<LineItem>,
    pub payment_method: PaymentMethod,
    pub delivery_type: DeliveryType,
}

#[derive(Deserialize)]
pub struct AdvanceRequest {
    pub target: OrderStatus,
    pub role: ActorRole,
}

#[derive(Deserialize)]
pub struct RoleRequest {
    pub role: ActorRole,
}

async fn create_order(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateOrderRequest>,
) -> Result<Json<Order>, AppError> {
    let branch = state
        .branches
        .get(&payload.branch_id)
        .map(|entry| entry.value().clone())
        .ok_or_else(|| AppError::NotFound(format!("branch {} not found", payload.branch_id)))?;

    if !hours::is_open_at(&branch.hours, Local::now().naive_local()) {
        return Err(AppError::Conflict(format!(
            "branch {} is closed",
            branch.name
        )));
    }

    if payload.items.is_empty() {
        return Err(AppError::BadRequest(
            "order must contain at least one item".to_string(),
        ));
    }
    for item in &payload.items {
        if item.quantity == 0 {
            return Err(AppError::BadRequest(format!(
                "item {} has zero quantity",
                item.name
            )));
        }
        if item.unit_price < 0.0 {
            return Err(AppError::BadRequest(format!(
                "item {} has a negative price",
                item.name
            )));
        }
    }

    let delivery_fee = match payload.delivery_type {
        DeliveryType::Delivery => state.config.delivery_fee,
        DeliveryType::Pickup => 0.0,
    };
    let total: f64 =
        payload.items.iter().map(LineItem::line_total).sum::<f64>() + delivery_fee;

    let order = Order {
        id: Uuid::new_v4(),
        number: state.next_order_number(),
        branch_id: payload.branch_id,
        customer_id: payload.customer_id,
        items: payload.items,
        delivery_fee,
        total,
        payment_method: payload.payment_method,
        delivery_type: payload.delivery_type,
        status: OrderStatus::Pending,
        delivery_id: None,
        delivery_requested_by: None,
        request_approved: false,
        // Cash needs no transfer confirmation; the gate never applies.
        admin_approved: payload.payment_method == PaymentMethod::Cash,
        created_at: Utc::now(),
    };

    state.orders.insert(order.id, order.clone());
    state.metrics.orders_active.inc();
    state.publish_order(&order);

    tracing::info!(order = %order.number, branch = %order.branch_id, "order created");

    Ok(Json(order))
}

async fn list_orders(State(state): State<Arc<AppState>>) -> Json<Vec<Order>> {
    let orders = state
        .orders
        .iter()
        .map(|entry| entry.value().clone())
        .collect();
    Json(orders)
}

async fn get_order(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Order>, AppError> {
    let order = state
        .orders
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("order {id} not found")))?;

    Ok(Json(order.value().clone()))
}

async fn advance_order(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AdvanceRequest>,
) -> Result<Json<Order>, AppError> {
    let updated = {
        let mut order = state
            .orders
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("order {id} not found")))?;

        lifecycle::advance(&mut order, payload.target, payload.role)?;
        order.clone()
    };

    state
        .metrics
        .transitions_total
        .with_label_values(&[payload.target.as_label()])
        .inc();
    if payload.target.is_terminal() {
        state.metrics.orders_active.dec();
    }
    state.publish_order(&updated);

    tracing::info!(
        order = %updated.number,
        status = updated.status.as_label(),
        "order advanced"
    );

    Ok(Json(updated))
}

async fn approve_payment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RoleRequest>,
) -> Result<Json<Order>, AppError> {
    let updated = {
        let mut order = state
            .orders
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("order {id} not found")))?;

        lifecycle::approve_payment(&mut order, payload.role)?;
        order.clone()
    };

    state.publish_order(&updated);
    tracing::info!(order = %updated.number, "transfer payment approved");

    Ok(Json(updated))
}

async fn cancel_order(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RoleRequest>,
) -> Result<Json<Order>, AppError> {
    let window = Duration::minutes(state.config.cancel_window_minutes);

    let updated = {
        let mut order = state
            .orders
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("order {id} not found")))?;

        lifecycle::cancel(&mut order, payload.role, Utc::now(), window)?;
        order.clone()
    };

    state
        .metrics
        .transitions_total
        .with_label_values(&[OrderStatus::Cancelled.as_label()])
        .inc();
    state.metrics.orders_active.dec();
    state.publish_order(&updated);

    tracing::info!(order = %updated.number, "order cancelled");

    Ok(Json(updated))
}
