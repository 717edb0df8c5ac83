use axum::{
    extract::{Path, State},
    routing::{get, patch},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use super::{
    dto::UpdateUserRequest,
    extractors::{ActiveProfile, HouseholdScope},
    repo_types::User,
    services,
};
use crate::{error::AppResult, state::AppState};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(get_me))
        .route("/users", get(list_users))
        .route("/users/:id", patch(update_user))
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    HouseholdScope(household_id): HouseholdScope,
    ActiveProfile(profile): ActiveProfile,
) -> AppResult<Json<User>> {
    let user = services::find_by_profile(&state, household_id, profile).await?;
    Ok(Json(user))
}

#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
    HouseholdScope(household_id): HouseholdScope,
) -> AppResult<Json<Vec<User>>> {
    Ok(Json(services::list_users(&state, household_id).await?))
}

#[instrument(skip(state, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    HouseholdScope(household_id): HouseholdScope,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUserRequest>,
) -> AppResult<Json<User>> {
    let user =
        services::update_user(&state, household_id, id, payload.name, payload.color).await?;
    Ok(Json(user))
}
