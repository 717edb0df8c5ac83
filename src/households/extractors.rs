use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};
use uuid::Uuid;

use super::repo_types::Profile;
use crate::state::AppState;

pub const HOUSEHOLD_HEADER: &str = "x-household-id";
pub const PROFILE_HEADER: &str = "x-household-profile";

/// Household every query of the request is scoped to. Falls back to the
/// provisioned household when the request does not name one.
#[derive(Debug, Clone, Copy)]
pub struct HouseholdScope(pub Uuid);

#[async_trait]
impl FromRequestParts<AppState> for HouseholdScope {
    type Rejection = (StatusCode, String);

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(raw) = parts.headers.get(HOUSEHOLD_HEADER) else {
            return Ok(HouseholdScope(state.household_id));
        };

        let id = raw
            .to_str()
            .ok()
            .and_then(|v| Uuid::parse_str(v.trim()).ok())
            .ok_or((StatusCode::BAD_REQUEST, "invalid household id".into()))?;

        Ok(HouseholdScope(id))
    }
}

/// Profile picked on the local profile selector.
#[derive(Debug, Clone, Copy)]
pub struct ActiveProfile(pub Profile);

#[async_trait]
impl FromRequestParts<AppState> for ActiveProfile {
    type Rejection = (StatusCode, String);

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(PROFILE_HEADER)
            .and_then(|h| h.to_str().ok())
            .ok_or((StatusCode::UNAUTHORIZED, "no profile selected".into()))?;

        Profile::parse(raw)
            .map(ActiveProfile)
            .ok_or((StatusCode::UNAUTHORIZED, "unknown profile".into()))
    }
}
