use axum::{
    extract::{Path, State},
    routing::{get, patch, post},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use super::{
    dto::{
        AddToShoppingListRequest, BabyItemView, CreateBabyItemRequest, CreateTaskFromItemRequest,
        UpdateBabyItemRequest,
    },
    repo_types::BabyChecklistItem,
    services,
};
use crate::{
    error::AppResult, households::extractors::HouseholdScope, shopping::repo_types::ShoppingItem,
    state::AppState, tasks::dto::TaskView,
};

pub fn baby_routes() -> Router<AppState> {
    Router::new()
        .route("/baby-items", get(list_items).post(create_item))
        .route("/baby-items/:id", patch(update_item))
        .route("/baby-items/:id/create-task", post(create_task))
        .route("/baby-items/:id/add-to-shopping-list", post(add_to_shopping_list))
}

#[instrument(skip(state))]
pub async fn list_items(
    State(state): State<AppState>,
    HouseholdScope(household_id): HouseholdScope,
) -> AppResult<Json<Vec<BabyItemView>>> {
    Ok(Json(services::list_items(&state, household_id).await?))
}

#[instrument(skip(state, payload))]
pub async fn create_item(
    State(state): State<AppState>,
    HouseholdScope(household_id): HouseholdScope,
    Json(payload): Json<CreateBabyItemRequest>,
) -> AppResult<Json<BabyChecklistItem>> {
    Ok(Json(services::create_item(&state, household_id, payload).await?))
}

#[instrument(skip(state, payload))]
pub async fn update_item(
    State(state): State<AppState>,
    HouseholdScope(household_id): HouseholdScope,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateBabyItemRequest>,
) -> AppResult<Json<BabyChecklistItem>> {
    Ok(Json(
        services::update_item(&state, household_id, id, payload).await?,
    ))
}

/// The body is optional; without one the task is left unassigned.
#[instrument(skip(state, payload))]
pub async fn create_task(
    State(state): State<AppState>,
    HouseholdScope(household_id): HouseholdScope,
    Path(id): Path<Uuid>,
    payload: Option<Json<CreateTaskFromItemRequest>>,
) -> AppResult<Json<TaskView>> {
    let req = payload.map(|Json(r)| r).unwrap_or_default();
    Ok(Json(
        services::create_task_from_item(&state, household_id, id, req.assigned_to_user_id).await?,
    ))
}

#[instrument(skip(state, payload))]
pub async fn add_to_shopping_list(
    State(state): State<AppState>,
    HouseholdScope(household_id): HouseholdScope,
    Path(id): Path<Uuid>,
    Json(payload): Json<AddToShoppingListRequest>,
) -> AppResult<Json<ShoppingItem>> {
    Ok(Json(
        services::add_item_to_shopping_list(&state, household_id, id, payload.shopping_list_id)
            .await?,
    ))
}
