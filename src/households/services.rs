use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, info};
use uuid::Uuid;

use super::repo::HouseholdRepo;
use super::repo_types::{Household, NewUser, Profile, User, UserChanges};
use crate::{
    config::HouseholdConfig,
    error::{require_text, AppError, AppResult},
    state::AppState,
};

pub(crate) fn is_valid_color(color: &str) -> bool {
    lazy_static! {
        static ref COLOR_RE: Regex = Regex::new(r"^#[0-9a-fA-F]{6}$").unwrap();
    }
    COLOR_RE.is_match(color)
}

/// Resolves the household this deployment serves: the configured id (created
/// on first start), else the oldest existing household, else a new one.
pub async fn provision_household(
    repo: &dyn HouseholdRepo,
    cfg: &HouseholdConfig,
) -> AppResult<Household> {
    if let Some(id) = cfg.id {
        if let Some(existing) = repo.find_household(id).await? {
            return Ok(existing);
        }
        let created = repo.create_household(id, &cfg.name).await?;
        info!(household_id = %created.id, "configured household created");
        return Ok(created);
    }

    if let Some(existing) = repo.oldest_household().await? {
        debug!(household_id = %existing.id, "using oldest household");
        return Ok(existing);
    }

    let created = repo.create_household(Uuid::new_v4(), &cfg.name).await?;
    info!(household_id = %created.id, "default household created");
    Ok(created)
}

/// Makes sure both canonical profiles exist. Safe to call repeatedly.
pub async fn ensure_seed_users(repo: &dyn HouseholdRepo, household_id: Uuid) -> AppResult<Vec<User>> {
    let mut users = repo.list_users(household_id).await?;

    let missing: Vec<Profile> = Profile::ALL
        .into_iter()
        .filter(|p| !users.iter().any(|u| u.matches_profile(*p)))
        .collect();

    for profile in missing {
        let user = repo
            .create_user(NewUser::for_profile(household_id, profile))
            .await?;
        info!(%household_id, user_id = %user.id, profile = profile.label(), "seed user created");
        users.push(user);
    }

    users.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(users)
}

pub async fn list_users(st: &AppState, household_id: Uuid) -> AppResult<Vec<User>> {
    Ok(st.households.list_users(household_id).await?)
}

pub async fn find_by_profile(
    st: &AppState,
    household_id: Uuid,
    profile: Profile,
) -> AppResult<User> {
    st.households
        .list_users(household_id)
        .await?
        .into_iter()
        .find(|u| u.matches_profile(profile))
        .ok_or(AppError::NotFound("User"))
}

pub async fn update_user(
    st: &AppState,
    household_id: Uuid,
    user_id: Uuid,
    name: Option<String>,
    color: Option<String>,
) -> AppResult<User> {
    let name = name.map(|n| require_text("name", &n)).transpose()?;
    if let Some(c) = color.as_deref() {
        if !is_valid_color(c) {
            return Err(AppError::validation("color must look like #rrggbb"));
        }
    }
    if name.is_none() && color.is_none() {
        return Err(AppError::validation("no valid fields provided"));
    }

    st.households
        .update_user(household_id, user_id, UserChanges { name, color })
        .await?
        .ok_or(AppError::NotFound("User"))
}

/// Confirms an optional assignee belongs to the household.
pub(crate) async fn check_assignee(
    st: &AppState,
    household_id: Uuid,
    assignee: Option<Uuid>,
) -> AppResult<()> {
    let Some(user_id) = assignee else {
        return Ok(());
    };
    let users = st.households.list_users(household_id).await?;
    if users.iter().any(|u| u.id == user_id) {
        Ok(())
    } else {
        Err(AppError::validation("assignee is not a member of this household"))
    }
}
