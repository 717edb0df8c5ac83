use std::collections::HashMap;

use tracing::info;
use uuid::Uuid;

use super::dto::{BabyItemView, CreateBabyItemRequest, UpdateBabyItemRequest};
use super::repo_types::{BabyChecklistItem, BabyItemChanges, BabyItemStatus, NewBabyItem};
use crate::{
    error::{require_text, AppError, AppResult},
    households::services::check_assignee,
    shopping::{
        self,
        dto::CreateItemRequest,
        repo_types::{ShoppingItem, ShoppingPriority},
    },
    state::AppState,
    tasks::{
        self,
        dto::{CreateTaskRequest, TaskView},
        repo_types::TaskType,
    },
};

/// Category given to shopping items spawned from the checklist.
pub const SHOPPING_CATEGORY: &str = "Baby";

pub async fn list_items(st: &AppState, household_id: Uuid) -> AppResult<Vec<BabyItemView>> {
    let items = st.baby.list_items(household_id).await?;
    let users: HashMap<Uuid, _> = st
        .households
        .list_users(household_id)
        .await?
        .into_iter()
        .map(|u| (u.id, u.summary()))
        .collect();

    Ok(items
        .into_iter()
        .map(|item| BabyItemView {
            assigned_to: item.assigned_to_user_id.and_then(|id| users.get(&id).cloned()),
            item,
        })
        .collect())
}

pub async fn create_item(
    st: &AppState,
    household_id: Uuid,
    req: CreateBabyItemRequest,
) -> AppResult<BabyChecklistItem> {
    let section = require_text("section", &req.section)?;
    let title = require_text("title", &req.title)?;
    check_assignee(st, household_id, req.assigned_to_user_id).await?;

    let item = st
        .baby
        .insert_item(NewBabyItem {
            household_id,
            section,
            title,
            item_type: req.item_type,
            due_date: req.due_date,
            assigned_to_user_id: req.assigned_to_user_id,
        })
        .await?;
    info!(%household_id, item_id = %item.id, section = %item.section, "baby item created");
    Ok(item)
}

pub async fn update_item(
    st: &AppState,
    household_id: Uuid,
    item_id: Uuid,
    req: UpdateBabyItemRequest,
) -> AppResult<BabyChecklistItem> {
    let title = req.title.map(|t| require_text("title", &t)).transpose()?;
    let section = req.section.map(|s| require_text("section", &s)).transpose()?;
    if let Some(assignee) = req.assigned_to_user_id {
        check_assignee(st, household_id, assignee).await?;
    }
    let now = st.clock.now();

    let changes = BabyItemChanges {
        title,
        section,
        item_type: req.item_type,
        due_date: req.due_date,
        assigned_to_user_id: req.assigned_to_user_id,
        status: req.status.map(|s| (s, s.completed_at(now))),
        ..Default::default()
    };
    if changes.is_empty() {
        return Err(AppError::validation("no valid fields provided"));
    }

    let item = st
        .baby
        .update_item(household_id, item_id, changes)
        .await?
        .ok_or(AppError::NotFound("Baby item"))?;
    info!(%household_id, %item_id, status = ?item.status, "baby item updated");
    Ok(item)
}

pub async fn update_status(
    st: &AppState,
    household_id: Uuid,
    item_id: Uuid,
    status: BabyItemStatus,
) -> AppResult<BabyChecklistItem> {
    update_item(
        st,
        household_id,
        item_id,
        UpdateBabyItemRequest {
            status: Some(status),
            ..Default::default()
        },
    )
    .await
}

async fn owned_item(st: &AppState, household_id: Uuid, item_id: Uuid) -> AppResult<BabyChecklistItem> {
    st.baby
        .find_item(household_id, item_id)
        .await?
        .ok_or(AppError::NotFound("Baby item"))
}

/// Spawns a BABY task from the item and links it back.
pub async fn create_task_from_item(
    st: &AppState,
    household_id: Uuid,
    item_id: Uuid,
    assignee: Option<Uuid>,
) -> AppResult<TaskView> {
    let item = owned_item(st, household_id, item_id).await?;

    let task = tasks::services::create_task(
        st,
        household_id,
        CreateTaskRequest {
            title: item.title.clone(),
            description: Some(format!("Baby preparation: {}", item.section)),
            task_type: TaskType::Baby,
            assigned_to_user_id: assignee,
            due_date: item.due_date,
        },
    )
    .await?;

    st.baby
        .update_item(
            household_id,
            item_id,
            BabyItemChanges {
                related_task_id: Some(task.task.id),
                ..Default::default()
            },
        )
        .await?
        .ok_or(AppError::NotFound("Baby item"))?;
    info!(%household_id, %item_id, task_id = %task.task.id, "task created from baby item");
    Ok(task)
}

/// Puts the item on a shopping list of the same household and links it back.
pub async fn add_item_to_shopping_list(
    st: &AppState,
    household_id: Uuid,
    item_id: Uuid,
    list_id: Uuid,
) -> AppResult<ShoppingItem> {
    let item = owned_item(st, household_id, item_id).await?;

    let shopping_item = shopping::services::create_item(
        st,
        household_id,
        list_id,
        CreateItemRequest {
            name: item.title.clone(),
            quantity: None,
            category: Some(SHOPPING_CATEGORY.to_string()),
            priority: ShoppingPriority::Medium,
        },
    )
    .await?;

    st.baby
        .update_item(
            household_id,
            item_id,
            BabyItemChanges {
                related_shopping_item_id: Some(shopping_item.id),
                ..Default::default()
            },
        )
        .await?
        .ok_or(AppError::NotFound("Baby item"))?;
    info!(%household_id, %item_id, shopping_item_id = %shopping_item.id, "baby item added to shopping list");
    Ok(shopping_item)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::baby::repo_types::BabyItemType;
    use time::macros::datetime;
    use time::OffsetDateTime;

    fn req(section: &str, title: &str, due: Option<OffsetDateTime>) -> CreateBabyItemRequest {
        CreateBabyItemRequest {
            section: section.into(),
            title: title.into(),
            item_type: BabyItemType::Purchase,
            due_date: due,
            assigned_to_user_id: None,
        }
    }

    #[tokio::test]
    async fn list_orders_by_section_then_due_date() {
        let st = AppState::fake();
        let h = st.household_id;
        create_item(&st, h, req("Nursery", "Crib", None)).await.unwrap();
        create_item(&st, h, req("Nursery", "Paint", Some(datetime!(2024-02-01 00:00 UTC))))
            .await
            .unwrap();
        create_item(&st, h, req("Hospital bag", "Onesies", None)).await.unwrap();

        let titles: Vec<String> = list_items(&st, h)
            .await
            .unwrap()
            .into_iter()
            .map(|v| v.item.title)
            .collect();
        assert_eq!(titles, vec!["Onesies", "Paint", "Crib"]);
    }

    #[tokio::test]
    async fn done_stamps_completed_at_and_reopen_clears_it() {
        let st = AppState::fake();
        let h = st.household_id;
        let item = create_item(&st, h, req("Nursery", "Crib", None)).await.unwrap();

        let done = update_status(&st, h, item.id, BabyItemStatus::Done).await.unwrap();
        assert_eq!(done.completed_at, Some(st.clock.now()));

        let reopened = update_status(&st, h, item.id, BabyItemStatus::InProgress)
            .await
            .unwrap();
        assert_eq!(reopened.completed_at, None);

        let err = update_status(&st, Uuid::new_v4(), item.id, BabyItemStatus::Done)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn spawned_task_is_linked_back() {
        let st = AppState::fake();
        let h = st.household_id;
        let due = datetime!(2024-03-01 12:00 UTC);
        let item = create_item(&st, h, req("Nursery", "Assemble crib", Some(due)))
            .await
            .unwrap();

        let task = create_task_from_item(&st, h, item.id, None).await.unwrap();
        assert_eq!(task.task.title, "Assemble crib");
        assert_eq!(task.task.task_type, TaskType::Baby);
        assert_eq!(task.task.description.as_deref(), Some("Baby preparation: Nursery"));
        assert_eq!(task.task.due_date, Some(due));

        let linked = st.baby.find_item(h, item.id).await.unwrap().unwrap();
        assert_eq!(linked.related_task_id, Some(task.task.id));
    }

    #[tokio::test]
    async fn shopping_item_is_created_on_owned_list_and_linked() {
        let st = AppState::fake();
        let h = st.household_id;
        let item = create_item(&st, h, req("Feeding", "Bottles", None)).await.unwrap();
        let list = shopping::services::create_shopping_list(&st, h, "Baby shop")
            .await
            .unwrap();

        let bought = add_item_to_shopping_list(&st, h, item.id, list.id).await.unwrap();
        assert_eq!(bought.name, "Bottles");
        assert_eq!(bought.category.as_deref(), Some(SHOPPING_CATEGORY));
        assert_eq!(bought.priority, ShoppingPriority::Medium);

        let linked = st.baby.find_item(h, item.id).await.unwrap().unwrap();
        assert_eq!(linked.related_shopping_item_id, Some(bought.id));

        let err = add_item_to_shopping_list(&st, h, item.id, Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn blank_section_is_rejected() {
        let st = AppState::fake();
        let err = create_item(&st, st.household_id, req(" ", "Crib", None))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
