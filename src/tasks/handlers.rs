use axum::{
    extract::{Path, State},
    routing::{get, patch, post},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use super::{
    dto::{
        CompletedOccurrence, CreateRecurringTaskRequest, CreateTaskRequest, RecurringTaskView,
        TaskView, UpdateTaskRequest,
    },
    services,
};
use crate::{error::AppResult, households::extractors::HouseholdScope, state::AppState};

pub fn task_routes() -> Router<AppState> {
    Router::new()
        .route("/tasks", post(create_task))
        .route("/tasks/today", get(today))
        .route("/tasks/week", get(week))
        .route("/tasks/:id", patch(update_task))
        .route(
            "/recurring-tasks",
            get(list_recurring).post(create_recurring),
        )
        .route("/recurring-tasks/:id/complete", post(complete_recurring))
}

#[instrument(skip(state))]
pub async fn today(
    State(state): State<AppState>,
    HouseholdScope(household_id): HouseholdScope,
) -> AppResult<Json<Vec<TaskView>>> {
    Ok(Json(services::tasks_for_today(&state, household_id).await?))
}

#[instrument(skip(state))]
pub async fn week(
    State(state): State<AppState>,
    HouseholdScope(household_id): HouseholdScope,
) -> AppResult<Json<Vec<TaskView>>> {
    Ok(Json(services::tasks_for_week(&state, household_id).await?))
}

#[instrument(skip(state, payload))]
pub async fn create_task(
    State(state): State<AppState>,
    HouseholdScope(household_id): HouseholdScope,
    Json(payload): Json<CreateTaskRequest>,
) -> AppResult<Json<TaskView>> {
    Ok(Json(services::create_task(&state, household_id, payload).await?))
}

#[instrument(skip(state, payload))]
pub async fn update_task(
    State(state): State<AppState>,
    HouseholdScope(household_id): HouseholdScope,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTaskRequest>,
) -> AppResult<Json<TaskView>> {
    Ok(Json(
        services::update_task(&state, household_id, id, payload).await?,
    ))
}

#[instrument(skip(state))]
pub async fn list_recurring(
    State(state): State<AppState>,
    HouseholdScope(household_id): HouseholdScope,
) -> AppResult<Json<Vec<RecurringTaskView>>> {
    Ok(Json(
        services::list_recurring_tasks(&state, household_id).await?,
    ))
}

#[instrument(skip(state, payload))]
pub async fn create_recurring(
    State(state): State<AppState>,
    HouseholdScope(household_id): HouseholdScope,
    Json(payload): Json<CreateRecurringTaskRequest>,
) -> AppResult<Json<RecurringTaskView>> {
    Ok(Json(
        services::create_recurring_task(&state, household_id, payload).await?,
    ))
}

#[instrument(skip(state))]
pub async fn complete_recurring(
    State(state): State<AppState>,
    HouseholdScope(household_id): HouseholdScope,
    Path(id): Path<Uuid>,
) -> AppResult<Json<CompletedOccurrence>> {
    Ok(Json(
        services::complete_recurring_task(&state, household_id, id).await?,
    ))
}
