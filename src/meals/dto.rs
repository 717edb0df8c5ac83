use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use super::repo_types::{MealPlanEntry, MealStatus};

/// One day of the week view; `meal` is null when nothing is planned.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySlot {
    #[serde(with = "crate::dates::day_key_serde")]
    pub date: Date,
    pub date_key: String,
    pub day_of_week: String,
    /// "Today", "Tomorrow", or "Mon, Jan 8".
    pub display_date: String,
    pub meal: Option<MealPlanEntry>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekMeals {
    /// Always seven slots, Monday first.
    pub week_meals: Vec<DaySlot>,
    pub week_offset: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub week_start: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub week_end: OffsetDateTime,
}

/// `date` (a day key) wins over `offset` when both are given.
#[derive(Debug, Default, Deserialize)]
pub struct WeekQuery {
    pub offset: Option<i64>,
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SaveMealRequest {
    #[serde(with = "crate::dates::day_key_serde")]
    pub date: Date,
    pub label: String,
    pub notes: Option<String>,
    #[serde(default)]
    pub status: MealStatus,
}

#[derive(Debug, Deserialize)]
pub struct UpdateMealStatusRequest {
    pub status: MealStatus,
}

#[derive(Debug, Serialize)]
pub struct StatusUpdateResponse {
    pub success: bool,
}
