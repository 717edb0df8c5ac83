use serde::Deserialize;

use super::repo_types::ShoppingPriority;

#[derive(Debug, Deserialize)]
pub struct CreateListRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemRequest {
    pub name: String,
    pub quantity: Option<String>,
    pub category: Option<String>,
    #[serde(default)]
    pub priority: ShoppingPriority,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItemRequest {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "crate::patch::nullable")]
    pub quantity: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::patch::nullable")]
    pub category: Option<Option<String>>,
    pub priority: Option<ShoppingPriority>,
    pub is_bought: Option<bool>,
}
