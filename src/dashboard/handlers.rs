use axum::{extract::State, routing::get, Json, Router};
use tracing::instrument;

use super::{dto::DashboardData, services};
use crate::{error::AppResult, households::extractors::HouseholdScope, state::AppState};

pub fn dashboard_routes() -> Router<AppState> {
    Router::new().route("/dashboard", get(get_dashboard))
}

#[instrument(skip(state))]
pub async fn get_dashboard(
    State(state): State<AppState>,
    HouseholdScope(household_id): HouseholdScope,
) -> AppResult<Json<DashboardData>> {
    Ok(Json(services::dashboard_data(&state, household_id).await?))
}
