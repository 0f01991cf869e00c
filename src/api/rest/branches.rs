use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::Json;
use axum::Router;
use chrono::{Local, NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::engine::hours;
use crate::error::AppError;
use crate::models::branch::{Branch, WeekSchedule};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/branches", post(create_branch).get(list_branches))
        .route("/branches/:id/open", get(branch_open))
        .route("/hours/next-open", get(next_open))
        .route("/hours/any-open", get(any_open))
}

#[derive(Deserialize)]
pub struct CreateBranchRequest {
    pub name: String,
    pub hours: WeekSchedule,
}

/// Optional evaluation instant; defaults to the local wall clock.
#[derive(Deserialize)]
pub struct AtQuery {
    pub at: Option<NaiveDateTime>,
}

#[derive(Serialize)]
pub struct OpenResponse {
    pub open: bool,
}

#[derive(Serialize)]
pub struct NextOpenResponse {
    pub weekday: &'static str,
    pub time: String,
    pub days_ahead: u8,
}

fn at_or_now(query: AtQuery) -> NaiveDateTime {
    query.at.unwrap_or_else(|| Local::now().naive_local())
}

fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}

async fn create_branch(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateBranchRequest>,
) -> Result<Json<Branch>, AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::BadRequest("name cannot be empty".to_string()));
    }

    // Windows crossing midnight are not supported; reject them up front
    // instead of silently misreading them.
    for day in &payload.hours.0 {
        if day.is_open && day.open >= day.close {
            return Err(AppError::BadRequest(
                "close time must be later than open time within the same day".to_string(),
            ));
        }
    }

    let branch = Branch {
        id: Uuid::new_v4(),
        name: payload.name,
        hours: payload.hours,
    };

    state.branches.insert(branch.id, branch.clone());
    tracing::info!(branch = %branch.id, name = %branch.name, "branch created");

    Ok(Json(branch))
}

async fn list_branches(State(state): State<Arc<AppState>>) -> Json<Vec<Branch>> {
    let branches = state
        .branches
        .iter()
        .map(|entry| entry.value().clone())
        .collect();
    Json(branches)
}

async fn branch_open(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Query(query): Query<AtQuery>,
) -> Result<Json<OpenResponse>, AppError> {
    let branch = state
        .branches
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("branch {id} not found")))?;

    let open = hours::is_open_at(&branch.hours, at_or_now(query));
    Ok(Json(OpenResponse { open }))
}

async fn next_open(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AtQuery>,
) -> Json<Option<NextOpenResponse>> {
    let now = at_or_now(query);
    let branches: Vec<Branch> = state
        .branches
        .iter()
        .map(|entry| entry.value().clone())
        .collect();

    let next = hours::next_opening_across(branches.iter(), now).map(|opening| NextOpenResponse {
        weekday: weekday_name(opening.weekday),
        time: opening.time.format("%H:%M").to_string(),
        days_ahead: opening.days_ahead,
    });

    Json(next)
}

async fn any_open(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AtQuery>,
) -> Json<OpenResponse> {
    let now = at_or_now(query);
    let branches: Vec<Branch> = state
        .branches
        .iter()
        .map(|entry| entry.value().clone())
        .collect();

    Json(OpenResponse {
        open: hours::any_open(branches.iter(), now),
    })
}
