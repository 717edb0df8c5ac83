use axum::{
    extract::{Path, State},
    routing::{get, patch},
    Json, Router,
};
use serde_json::{json, Value};
use tracing::instrument;
use uuid::Uuid;

use super::{
    dto::{CreateItemRequest, CreateListRequest, UpdateItemRequest},
    repo_types::{ShoppingItem, ShoppingList},
    services,
};
use crate::{error::AppResult, households::extractors::HouseholdScope, state::AppState};

pub fn shopping_routes() -> Router<AppState> {
    Router::new()
        .route("/shopping-lists", get(list_lists).post(create_list))
        .route("/shopping-lists/:id/items", get(list_items).post(create_item))
        .route("/shopping-items/:id", patch(update_item).delete(delete_item))
}

#[instrument(skip(state))]
pub async fn list_lists(
    State(state): State<AppState>,
    HouseholdScope(household_id): HouseholdScope,
) -> AppResult<Json<Vec<ShoppingList>>> {
    Ok(Json(services::list_shopping_lists(&state, household_id).await?))
}

#[instrument(skip(state, payload))]
pub async fn create_list(
    State(state): State<AppState>,
    HouseholdScope(household_id): HouseholdScope,
    Json(payload): Json<CreateListRequest>,
) -> AppResult<Json<ShoppingList>> {
    Ok(Json(
        services::create_shopping_list(&state, household_id, &payload.name).await?,
    ))
}

#[instrument(skip(state))]
pub async fn list_items(
    State(state): State<AppState>,
    HouseholdScope(household_id): HouseholdScope,
    Path(list_id): Path<Uuid>,
) -> AppResult<Json<Vec<ShoppingItem>>> {
    Ok(Json(services::list_items(&state, household_id, list_id).await?))
}

#[instrument(skip(state, payload))]
pub async fn create_item(
    State(state): State<AppState>,
    HouseholdScope(household_id): HouseholdScope,
    Path(list_id): Path<Uuid>,
    Json(payload): Json<CreateItemRequest>,
) -> AppResult<Json<ShoppingItem>> {
    Ok(Json(
        services::create_item(&state, household_id, list_id, payload).await?,
    ))
}

#[instrument(skip(state, payload))]
pub async fn update_item(
    State(state): State<AppState>,
    HouseholdScope(household_id): HouseholdScope,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateItemRequest>,
) -> AppResult<Json<ShoppingItem>> {
    Ok(Json(
        services::update_item(&state, household_id, id, payload).await?,
    ))
}

#[instrument(skip(state))]
pub async fn delete_item(
    State(state): State<AppState>,
    HouseholdScope(household_id): HouseholdScope,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Value>> {
    services::delete_item(&state, household_id, id).await?;
    Ok(Json(json!({ "success": true })))
}
