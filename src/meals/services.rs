use std::collections::HashMap;

use time::{Date, OffsetDateTime};
use tracing::{debug, info};
use uuid::Uuid;

use super::dto::{DaySlot, WeekMeals};
use super::repo_types::{MealPlanEntry, MealStatus, MealUpsert};
use crate::{
    dates::{self, WeekBounds},
    error::{require_text, AppError, AppResult},
    state::AppState,
};

/// Lays the persisted dinners out on the seven days of `week`.
pub fn build_week(
    week: &WeekBounds,
    meals: Vec<MealPlanEntry>,
    now: OffsetDateTime,
) -> Vec<DaySlot> {
    let mut by_day: HashMap<String, MealPlanEntry> = meals
        .into_iter()
        .map(|m| (dates::day_key(m.date), m))
        .collect();

    week.days()
        .into_iter()
        .map(|date| {
            let date_key = dates::day_key(date);
            DaySlot {
                meal: by_day.remove(&date_key),
                day_of_week: dates::day_name(date),
                display_date: dates::display_date(date.midnight().assume_offset(now.offset()), now),
                date,
                date_key,
            }
        })
        .collect()
}

/// Week offset, relative to the current week, of the week containing `day_key`.
pub fn offset_for_day(st: &AppState, day_key: &str) -> AppResult<i64> {
    let date = dates::parse_day_key(day_key)
        .map_err(|_| AppError::validation("date must look like YYYY-MM-DD"))?;
    dates::week_offset(date, st.clock.now())
        .ok_or_else(|| AppError::validation("date is out of range"))
}

pub async fn meals_for_week(
    st: &AppState,
    household_id: Uuid,
    week_offset: i64,
) -> AppResult<WeekMeals> {
    let now = st.clock.now();
    let week = dates::shift_weeks(now, week_offset)
        .and_then(dates::current_week)
        .ok_or_else(|| AppError::validation("week offset out of range"))?;

    let meals = st
        .meals
        .list_dinners_between(household_id, week.first_day(), week.last_day())
        .await?;
    debug!(%household_id, week_offset, found = meals.len(), "week meals loaded");

    Ok(WeekMeals {
        week_meals: build_week(&week, meals, now),
        week_offset,
        week_start: week.start,
        week_end: week.end,
    })
}

/// Upsert keyed by household and calendar day; callers never pass an id.
pub async fn create_or_update_meal(
    st: &AppState,
    household_id: Uuid,
    date: Date,
    label: &str,
    notes: Option<String>,
    status: MealStatus,
) -> AppResult<MealPlanEntry> {
    let label = require_text("label", label)?;
    let notes = notes.filter(|n| !n.trim().is_empty());

    let meal = st
        .meals
        .upsert_dinner(MealUpsert {
            household_id,
            date,
            day_of_week: dates::day_name(date),
            label,
            notes,
            status,
        })
        .await?;
    info!(%household_id, meal_id = %meal.id, date = %dates::day_key(date), "meal saved");
    Ok(meal)
}

/// Number of meals updated: zero when the meal does not belong to the household.
pub async fn update_meal_status(
    st: &AppState,
    household_id: Uuid,
    meal_id: Uuid,
    status: MealStatus,
) -> AppResult<u64> {
    let count = st.meals.update_status(household_id, meal_id, status).await?;
    debug!(%household_id, %meal_id, ?status, count, "meal status update");
    Ok(count)
}

pub async fn dinner_on(
    st: &AppState,
    household_id: Uuid,
    at: OffsetDateTime,
) -> AppResult<Option<MealPlanEntry>> {
    Ok(st.meals.find_dinner_on(household_id, at.date()).await?)
}

/// Raw dinners of a week, not padded to seven days.
pub async fn dinners_in_week(
    st: &AppState,
    household_id: Uuid,
    week: &WeekBounds,
) -> AppResult<Vec<MealPlanEntry>> {
    Ok(st
        .meals
        .list_dinners_between(household_id, week.first_day(), week.last_day())
        .await?)
}
