use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::{patch, post};
use axum::Json;
use axum::Router;
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::actor::ActorRole;
use crate::models::worker::{DeliveryWorker, WorkerApproval};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/workers", post(register_worker).get(list_workers))
        .route("/workers/:id/approval", patch(set_approval))
        .route("/workers/:id/remove", post(remove_worker))
}

#[derive(Deserialize)]
pub struct RegisterWorkerRequest {
    pub name: String,
    pub branch_id: Uuid,
}

#[derive(Deserialize)]
pub struct SetApprovalRequest {
    pub approval: WorkerApproval,
    pub role: ActorRole,
}

#[derive(Deserialize)]
pub struct RemoveWorkerRequest {
    pub role: ActorRole,
}

async fn register_worker(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterWorkerRequest>,
) -> Result<Json<DeliveryWorker>, AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::BadRequest("name cannot be empty".to_string()));
    }

    if !state.branches.contains_key(&payload.branch_id) {
        return Err(AppError::NotFound(format!(
            "branch {} not found",
            payload.branch_id
        )));
    }

    // Self-registration always starts pending; a branch or admin approves.
    let worker = DeliveryWorker {
        id: Uuid::new_v4(),
        name: payload.name,
        approval: WorkerApproval::Pending,
        branch_id: payload.branch_id,
        removed: false,
        created_at: Utc::now(),
    };

    state.workers.insert(worker.id, worker.clone());
    tracing::info!(worker = %worker.id, branch = %worker.branch_id, "worker registered");

    Ok(Json(worker))
}

async fn list_workers(State(state): State<Arc<AppState>>) -> Json<Vec<DeliveryWorker>> {
    let workers = state
        .workers
        .iter()
        .map(|entry| entry.value().clone())
        .collect();
    Json(workers)
}

async fn set_approval(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetApprovalRequest>,
) -> Result<Json<DeliveryWorker>, AppError> {
    if !payload.role.is_staff() {
        return Err(AppError::NotAuthorized(
            "only branch staff or an admin may change worker approval".to_string(),
        ));
    }

    let mut worker = state
        .workers
        .get_mut(&id)
        .ok_or_else(|| AppError::NotFound(format!("worker {id} not found")))?;

    worker.approval = payload.approval;
    Ok(Json(worker.clone()))
}

/// Soft remove. Historical orders keep referencing the worker's id, so the
/// record stays; the worker just stops being eligible for claims.
async fn remove_worker(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RemoveWorkerRequest>,
) -> Result<Json<DeliveryWorker>, AppError> {
    if !payload.role.is_staff() {
        return Err(AppError::NotAuthorized(
            "only branch staff or an admin may remove a worker".to_string(),
        ));
    }

    let mut worker = state
        .workers
        .get_mut(&id)
        .ok_or_else(|| AppError::NotFound(format!("worker {id} not found")))?;

    worker.removed = true;
    Ok(Json(worker.clone()))
}
