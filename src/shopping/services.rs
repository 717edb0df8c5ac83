use tracing::info;
use uuid::Uuid;

use super::dto::{CreateItemRequest, UpdateItemRequest};
use super::repo_types::{
    NewShoppingItem, ShoppingItem, ShoppingItemChanges, ShoppingList, UrgentShoppingItem,
};
use crate::{
    error::{require_text, AppError, AppResult},
    state::AppState,
};

pub async fn list_shopping_lists(st: &AppState, household_id: Uuid) -> AppResult<Vec<ShoppingList>> {
    Ok(st.shopping.list_lists(household_id).await?)
}

pub async fn create_shopping_list(
    st: &AppState,
    household_id: Uuid,
    name: &str,
) -> AppResult<ShoppingList> {
    let name = require_text("name", name)?;
    let list = st.shopping.create_list(household_id, &name).await?;
    info!(%household_id, list_id = %list.id, "shopping list created");
    Ok(list)
}

async fn owned_list(st: &AppState, household_id: Uuid, list_id: Uuid) -> AppResult<ShoppingList> {
    st.shopping
        .find_list(household_id, list_id)
        .await?
        .ok_or(AppError::NotFound("List"))
}

pub async fn list_items(
    st: &AppState,
    household_id: Uuid,
    list_id: Uuid,
) -> AppResult<Vec<ShoppingItem>> {
    let list = owned_list(st, household_id, list_id).await?;
    Ok(st.shopping.list_items(list.id).await?)
}

pub async fn create_item(
    st: &AppState,
    household_id: Uuid,
    list_id: Uuid,
    req: CreateItemRequest,
) -> AppResult<ShoppingItem> {
    let name = require_text("name", &req.name)?;
    let list = owned_list(st, household_id, list_id).await?;

    let item = st
        .shopping
        .insert_item(NewShoppingItem {
            list_id: list.id,
            name,
            quantity: req.quantity,
            category: req.category,
            priority: req.priority,
        })
        .await?;
    info!(%household_id, %list_id, item_id = %item.id, priority = ?item.priority, "shopping item created");
    Ok(item)
}

/// Marking bought stamps `boughtAt`, unmarking clears it.
pub async fn update_item(
    st: &AppState,
    household_id: Uuid,
    item_id: Uuid,
    req: UpdateItemRequest,
) -> AppResult<ShoppingItem> {
    let name = req.name.map(|n| require_text("name", &n)).transpose()?;
    let now = st.clock.now();

    let changes = ShoppingItemChanges {
        name,
        quantity: req.quantity,
        category: req.category,
        priority: req.priority,
        bought: req.is_bought.map(|b| (b, b.then_some(now))),
    };
    if changes.is_empty() {
        return Err(AppError::validation("no valid fields provided"));
    }

    let item = st
        .shopping
        .update_item(household_id, item_id, changes)
        .await?
        .ok_or(AppError::NotFound("Item"))?;
    info!(%household_id, %item_id, is_bought = item.is_bought, "shopping item updated");
    Ok(item)
}

pub async fn delete_item(st: &AppState, household_id: Uuid, item_id: Uuid) -> AppResult<()> {
    if !st.shopping.delete_item(household_id, item_id).await? {
        return Err(AppError::NotFound("Item"));
    }
    info!(%household_id, %item_id, "shopping item deleted");
    Ok(())
}

pub async fn urgent_items(st: &AppState, household_id: Uuid) -> AppResult<Vec<UrgentShoppingItem>> {
    Ok(st.shopping.list_urgent(household_id).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shopping::repo_types::ShoppingPriority;

    fn item(name: &str, priority: ShoppingPriority) -> CreateItemRequest {
        CreateItemRequest {
            name: name.into(),
            quantity: None,
            category: None,
            priority,
        }
    }

    #[tokio::test]
    async fn items_are_ordered_by_priority_then_age() {
        let st = AppState::fake();
        let h = st.household_id;
        let list = create_shopping_list(&st, h, "Groceries").await.unwrap();

        create_item(&st, h, list.id, item("bread", ShoppingPriority::Low)).await.unwrap();
        create_item(&st, h, list.id, item("milk", ShoppingPriority::High)).await.unwrap();
        create_item(&st, h, list.id, item("eggs", ShoppingPriority::Medium)).await.unwrap();
        create_item(&st, h, list.id, item("nappies", ShoppingPriority::High)).await.unwrap();

        let names: Vec<String> = list_items(&st, h, list.id)
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.name)
            .collect();
        assert_eq!(names, vec!["milk", "nappies", "eggs", "bread"]);
    }

    #[tokio::test]
    async fn bought_flag_moves_with_timestamp() {
        let st = AppState::fake();
        let h = st.household_id;
        let list = create_shopping_list(&st, h, "Groceries").await.unwrap();
        let milk = create_item(&st, h, list.id, item("milk", ShoppingPriority::High))
            .await
            .unwrap();

        let bought = update_item(
            &st,
            h,
            milk.id,
            UpdateItemRequest {
                is_bought: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert!(bought.is_bought);
        assert_eq!(bought.bought_at, Some(st.clock.now()));

        let unbought = update_item(
            &st,
            h,
            milk.id,
            UpdateItemRequest {
                is_bought: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert!(!unbought.is_bought);
        assert_eq!(unbought.bought_at, None);
    }

    #[tokio::test]
    async fn urgent_only_lists_unbought_high_items() {
        let st = AppState::fake();
        let h = st.household_id;
        let list = create_shopping_list(&st, h, "Pharmacy").await.unwrap();
        let first = create_item(&st, h, list.id, item("formula", ShoppingPriority::High))
            .await
            .unwrap();
        create_item(&st, h, list.id, item("plasters", ShoppingPriority::Medium))
            .await
            .unwrap();
        let bought = create_item(&st, h, list.id, item("wipes", ShoppingPriority::High))
            .await
            .unwrap();
        update_item(
            &st,
            h,
            bought.id,
            UpdateItemRequest {
                is_bought: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let urgent = urgent_items(&st, h).await.unwrap();
        assert_eq!(urgent.len(), 1);
        assert_eq!(urgent[0].item.id, first.id);
        assert_eq!(urgent[0].list_name, "Pharmacy");
    }

    #[tokio::test]
    async fn urgent_items_span_lists_newest_first() {
        let st = AppState::fake();
        let h = st.household_id;
        let pharmacy = create_shopping_list(&st, h, "Pharmacy").await.unwrap();
        let grocery = create_shopping_list(&st, h, "Grocery").await.unwrap();
        let formula = create_item(&st, h, pharmacy.id, item("formula", ShoppingPriority::High))
            .await
            .unwrap();
        let milk = create_item(&st, h, grocery.id, item("milk", ShoppingPriority::High))
            .await
            .unwrap();
        create_item(&st, h, grocery.id, item("bread", ShoppingPriority::Low))
            .await
            .unwrap();
        let drops = create_item(&st, h, pharmacy.id, item("drops", ShoppingPriority::High))
            .await
            .unwrap();

        let other = Uuid::new_v4();
        let foreign = create_shopping_list(&st, other, "Elsewhere").await.unwrap();
        create_item(&st, other, foreign.id, item("batteries", ShoppingPriority::High))
            .await
            .unwrap();

        let urgent = urgent_items(&st, h).await.unwrap();
        let got: Vec<(Uuid, &str)> = urgent
            .iter()
            .map(|u| (u.item.id, u.list_name.as_str()))
            .collect();
        assert_eq!(
            got,
            vec![
                (drops.id, "Pharmacy"),
                (milk.id, "Grocery"),
                (formula.id, "Pharmacy"),
            ]
        );
        assert!(urgent
            .windows(2)
            .all(|w| w[0].item.created_at > w[1].item.created_at));
    }

    #[tokio::test]
    async fn foreign_household_cannot_touch_list_or_items() {
        let st = AppState::fake();
        let h = st.household_id;
        let other = Uuid::new_v4();
        let list = create_shopping_list(&st, h, "Groceries").await.unwrap();
        let milk = create_item(&st, h, list.id, item("milk", ShoppingPriority::Medium))
            .await
            .unwrap();

        let err = list_items(&st, other, list.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        let err = create_item(&st, other, list.id, item("beer", ShoppingPriority::Low))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        let err = delete_item(&st, other, milk.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        assert_eq!(list_items(&st, h, list.id).await.unwrap().len(), 1);
        delete_item(&st, h, milk.id).await.unwrap();
        assert!(list_items(&st, h, list.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn blank_names_are_rejected() {
        let st = AppState::fake();
        let err = create_shopping_list(&st, st.household_id, "  ").await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
