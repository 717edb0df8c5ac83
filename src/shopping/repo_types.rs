use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Declared in the same order as the Postgres enum: `ORDER BY priority DESC`
/// puts HIGH first.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "shopping_priority", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShoppingPriority {
    Low,
    #[default]
    Medium,
    High,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingList {
    pub id: Uuid,
    pub household_id: Uuid,
    pub name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingItem {
    pub id: Uuid,
    pub list_id: Uuid,
    pub name: String,
    pub quantity: Option<String>,
    pub category: Option<String>,
    pub priority: ShoppingPriority,
    pub is_bought: bool,
    #[serde(with = "time::serde::rfc3339::option")]
    pub bought_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// HIGH priority item still to buy, with the name of its list.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UrgentShoppingItem {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub item: ShoppingItem,
    pub list_name: String,
}

#[derive(Debug, Clone)]
pub struct NewShoppingItem {
    pub list_id: Uuid,
    pub name: String,
    pub quantity: Option<String>,
    pub category: Option<String>,
    pub priority: ShoppingPriority,
}

/// Partial update; `bought` carries `is_bought` and the matching `bought_at`.
#[derive(Debug, Clone, Default)]
pub struct ShoppingItemChanges {
    pub name: Option<String>,
    pub quantity: Option<Option<String>>,
    pub category: Option<Option<String>>,
    pub priority: Option<ShoppingPriority>,
    pub bought: Option<(bool, Option<OffsetDateTime>)>,
}

impl ShoppingItemChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.quantity.is_none()
            && self.category.is_none()
            && self.priority.is_none()
            && self.bought.is_none()
    }
}
