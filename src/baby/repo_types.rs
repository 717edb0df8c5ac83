use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "baby_item_type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BabyItemType {
    Task,
    Purchase,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "baby_item_status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BabyItemStatus {
    #[default]
    Todo,
    InProgress,
    Done,
}

impl BabyItemStatus {
    pub fn completed_at(self, now: OffsetDateTime) -> Option<OffsetDateTime> {
        (self == BabyItemStatus::Done).then_some(now)
    }
}

/// Preparation item. May point at the task or shopping item spawned from it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct BabyChecklistItem {
    pub id: Uuid,
    pub household_id: Uuid,
    pub section: String,
    pub title: String,
    pub item_type: BabyItemType,
    pub status: BabyItemStatus,
    #[serde(with = "time::serde::rfc3339::option")]
    pub due_date: Option<OffsetDateTime>,
    pub assigned_to_user_id: Option<Uuid>,
    pub related_task_id: Option<Uuid>,
    pub related_shopping_item_id: Option<Uuid>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub completed_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewBabyItem {
    pub household_id: Uuid,
    pub section: String,
    pub title: String,
    pub item_type: BabyItemType,
    pub due_date: Option<OffsetDateTime>,
    pub assigned_to_user_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default)]
pub struct BabyItemChanges {
    pub title: Option<String>,
    pub section: Option<String>,
    pub item_type: Option<BabyItemType>,
    pub due_date: Option<Option<OffsetDateTime>>,
    pub assigned_to_user_id: Option<Option<Uuid>>,
    pub status: Option<(BabyItemStatus, Option<OffsetDateTime>)>,
    pub related_task_id: Option<Uuid>,
    pub related_shopping_item_id: Option<Uuid>,
}

impl BabyItemChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.section.is_none()
            && self.item_type.is_none()
            && self.due_date.is_none()
            && self.assigned_to_user_id.is_none()
            && self.status.is_none()
            && self.related_task_id.is_none()
            && self.related_shopping_item_id.is_none()
    }
}
