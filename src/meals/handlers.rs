use axum::{
    extract::{Path, Query, State},
    routing::{get, patch},
    Json, Router,
};
use tracing::{instrument, warn};
use uuid::Uuid;

use super::{
    dto::{SaveMealRequest, StatusUpdateResponse, UpdateMealStatusRequest, WeekMeals, WeekQuery},
    repo_types::MealPlanEntry,
    services,
};
use crate::{error::AppResult, households::extractors::HouseholdScope, state::AppState};

pub fn meal_routes() -> Router<AppState> {
    Router::new()
        .route("/meals", get(get_week).post(save_meal))
        .route("/meals/:id", patch(update_status))
}

#[instrument(skip(state))]
pub async fn get_week(
    State(state): State<AppState>,
    HouseholdScope(household_id): HouseholdScope,
    Query(q): Query<WeekQuery>,
) -> AppResult<Json<WeekMeals>> {
    let offset = match q.date.as_deref() {
        Some(day) => services::offset_for_day(&state, day)?,
        None => q.offset.unwrap_or(0),
    };
    Ok(Json(services::meals_for_week(&state, household_id, offset).await?))
}

#[instrument(skip(state, payload))]
pub async fn save_meal(
    State(state): State<AppState>,
    HouseholdScope(household_id): HouseholdScope,
    Json(payload): Json<SaveMealRequest>,
) -> AppResult<Json<MealPlanEntry>> {
    let meal = services::create_or_update_meal(
        &state,
        household_id,
        payload.date,
        &payload.label,
        payload.notes,
        payload.status,
    )
    .await?;
    Ok(Json(meal))
}

#[instrument(skip(state, payload))]
pub async fn update_status(
    State(state): State<AppState>,
    HouseholdScope(household_id): HouseholdScope,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateMealStatusRequest>,
) -> AppResult<Json<StatusUpdateResponse>> {
    let count = services::update_meal_status(&state, household_id, id, payload.status).await?;
    if count == 0 {
        warn!(%household_id, meal_id = %id, "meal status update matched nothing");
    }
    Ok(Json(StatusUpdateResponse { success: count > 0 }))
}
