use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

/// Only dinners are planned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "meal_type")]
pub enum MealType {
    #[serde(rename = "DINER")]
    #[sqlx(rename = "DINER")]
    Dinner,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "meal_status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MealStatus {
    #[default]
    Planned,
    Done,
}

/// One planned dinner. At most one per household, day and meal type.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MealPlanEntry {
    pub id: Uuid,
    pub household_id: Uuid,
    #[serde(with = "crate::dates::day_key_serde")]
    pub date: Date,
    pub day_of_week: String,
    pub meal_type: MealType,
    pub label: String,
    pub notes: Option<String>,
    pub status: MealStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct MealUpsert {
    pub household_id: Uuid,
    pub date: Date,
    pub day_of_week: String,
    pub label: String,
    pub notes: Option<String>,
    pub status: MealStatus,
}
