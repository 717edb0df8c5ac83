use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo_types::{BabyChecklistItem, BabyItemStatus, BabyItemType};
use crate::households::repo_types::UserSummary;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BabyItemView {
    #[serde(flatten)]
    pub item: BabyChecklistItem,
    pub assigned_to: Option<UserSummary>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBabyItemRequest {
    pub section: String,
    pub title: String,
    pub item_type: BabyItemType,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub due_date: Option<OffsetDateTime>,
    pub assigned_to_user_id: Option<Uuid>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBabyItemRequest {
    pub title: Option<String>,
    pub section: Option<String>,
    pub item_type: Option<BabyItemType>,
    #[serde(default, deserialize_with = "crate::patch::nullable_rfc3339")]
    pub due_date: Option<Option<OffsetDateTime>>,
    #[serde(default, deserialize_with = "crate::patch::nullable")]
    pub assigned_to_user_id: Option<Option<Uuid>>,
    pub status: Option<BabyItemStatus>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskFromItemRequest {
    pub assigned_to_user_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToShoppingListRequest {
    pub shopping_list_id: Uuid,
}
