use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::post;
use axum::Json;
use axum::Router;
use serde::Deserialize;
use uuid::Uuid;

use crate::engine::claims;
use crate::error::AppError;
use crate::models::actor::ActorRole;
use crate::models::order::{Order, OrderStatus};
use crate::models::worker::DeliveryWorker;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/orders/:id/claim", post(claim_order))
        .route("/orders/:id/resolve-request", post(resolve_request))
        .route("/orders/:id/dispatch", post(dispatch_order))
}

#[derive(Deserialize)]
pub struct ClaimRequest {
    pub worker_id: Uuid,
}

#[derive(Deserialize)]
pub struct ResolveRequest {
    pub approve: bool,
    pub role: ActorRole,
}

#[derive(Deserialize)]
pub struct DispatchRequest {
    pub worker_id: Uuid,
    pub role: ActorRole,
}

fn load_worker(state: &AppState, id: Uuid) -> Result<DeliveryWorker, AppError> {
    state
        .workers
        .get(&id)
        .map(|entry| entry.value().clone())
        .ok_or_else(|| AppError::NotFound(format!("worker {id} not found")))
}

async fn claim_order(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ClaimRequest>,
) -> Result<Json<Order>, AppError> {
    let worker = load_worker(&state, payload.worker_id)?;

    // Counted before taking the order entry: iterating the order map while
    // holding one of its entries can deadlock on a shard. The count only
    // picks direct-vs-request; exclusivity is checked under the entry lock.
    let active = state.active_assignments(worker.id, id);

    let (updated, outcome) = {
        let mut order = state
            .orders
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("order {id} not found")))?;

        let outcome = claims::claim(&mut order, &worker, active)?;
        (order.clone(), outcome)
    };

    state
        .metrics
        .claims_total
        .with_label_values(&[outcome.as_label()])
        .inc();
    state.publish_order(&updated);

    tracing::info!(
        order = %updated.number,
        worker = %worker.id,
        outcome = outcome.as_label(),
        "claim processed"
    );

    Ok(Json(updated))
}

async fn resolve_request(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ResolveRequest>,
) -> Result<Json<Order>, AppError> {
    let updated = {
        let mut order = state
            .orders
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("order {id} not found")))?;

        claims::resolve_request(&mut order, payload.approve, payload.role)?;
        order.clone()
    };

    let decision = if payload.approve { "approved" } else { "rejected" };
    state
        .metrics
        .request_resolutions_total
        .with_label_values(&[decision])
        .inc();
    state.publish_order(&updated);

    tracing::info!(order = %updated.number, decision, "claim request resolved");

    Ok(Json(updated))
}

async fn dispatch_order(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<DispatchRequest>,
) -> Result<Json<Order>, AppError> {
    let worker = load_worker(&state, payload.worker_id)?;

    let updated = {
        let mut order = state
            .orders
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("order {id} not found")))?;

        claims::assign_for_dispatch(&mut order, &worker, payload.role)?;
        order.clone()
    };

    state
        .metrics
        .transitions_total
        .with_label_values(&[OrderStatus::Dispatched.as_label()])
        .inc();
    state.publish_order(&updated);

    tracing::info!(order = %updated.number, worker = %worker.id, "order dispatched");

    Ok(Json(updated))
}
